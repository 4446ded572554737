use serde::Deserialize;

/// `?start=YYYY-MM-DD&end=YYYY-MM-DD`
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// `?month=YYYY-MM`
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}
