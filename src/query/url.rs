//! Query string form of the listing state, so a view can be bookmarked and
//! restored.

use url::Url;
use url::form_urlencoded;

pub const PARAM_SRC_LOCALE: &str = "srcLocale";
pub const PARAM_LOCALE: &str = "locale";
pub const PARAM_FILTER: &str = "filter";
pub const PARAM_SORT: &str = "sort";
pub const PARAM_INDEX: &str = "index";
pub const PARAM_PAGE: &str = "page";

const KNOWN_PARAMS: [&str; 6] = [
    PARAM_SRC_LOCALE,
    PARAM_LOCALE,
    PARAM_FILTER,
    PARAM_SORT,
    PARAM_INDEX,
    PARAM_PAGE,
];

/// Listing parameters carried in a URL. Every field is optional; absent
/// fields leave the current state alone when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlState {
    pub src_locale: Option<String>,
    pub locale: Option<String>,
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub index: Option<usize>,
    pub page: Option<u32>,
}

impl UrlState {
    /// Parse a query string, with or without the leading `?`. Unknown
    /// parameters are ignored, as are numbers that do not parse.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = UrlState::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                PARAM_SRC_LOCALE => state.src_locale = non_empty(value),
                PARAM_LOCALE => state.locale = non_empty(value),
                PARAM_FILTER => state.filter = Some(value),
                PARAM_SORT => state.sort = non_empty(value),
                PARAM_INDEX => state.index = value.parse().ok(),
                PARAM_PAGE => state.page = value.parse().ok(),
                _ => {}
            }
        }
        state
    }

    pub fn from_url(url: &Url) -> Self {
        Self::parse(url.query().unwrap_or(""))
    }

    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(src) = &self.src_locale {
            pairs.push((PARAM_SRC_LOCALE, src.clone()));
        }
        if let Some(locale) = &self.locale {
            pairs.push((PARAM_LOCALE, locale.clone()));
        }
        if let Some(filter) = self.filter.as_ref().filter(|f| !f.is_empty()) {
            pairs.push((PARAM_FILTER, filter.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push((PARAM_SORT, sort.clone()));
        }
        if let Some(index) = self.index {
            pairs.push((PARAM_INDEX, index.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push((PARAM_PAGE, page.to_string()));
        }
        pairs
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }

    /// Write the state into `url`, replacing the listing parameters and
    /// keeping any others.
    pub fn apply_to(&self, url: &mut Url) {
        let others: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !KNOWN_PARAMS.contains(&key.as_ref()))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let pairs = self.pairs();
        if others.is_empty() && pairs.is_empty() {
            url.set_query(None);
            return;
        }

        let mut query = url.query_pairs_mut();
        query.clear();
        query.extend_pairs(others);
        query.extend_pairs(pairs);
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}
