use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Anything other than `desc` (case-insensitive) is ascending.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortField {
    pub field: String,
    pub direction: SortDirection,
}

/// Filter value typed by syntax alone: integer, then float, then boolean,
/// else string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

impl Scalar {
    #[must_use]
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(v) = trimmed.parse::<i64>() {
            return Self::Integer(v);
        }
        if let Ok(v) = trimmed.parse::<f64>() {
            if v.is_finite() {
                return Self::Float(v);
            }
        }
        if let Ok(v) = trimmed.parse::<bool>() {
            return Self::Boolean(v);
        }
        Self::Text(trimmed.to_string())
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Boolean(_) | Self::Text(_) => None,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::Text(_) => "string",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
}

impl FilterOperator {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "like" => Some(Self::Like),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Gt | Self::Gte | Self::Lt | Self::Lte)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterPredicate {
    /// Lower-cased operator as written; unknown operators are kept verbatim.
    pub operator: String,
    pub value: Scalar,
}

impl FilterPredicate {
    #[must_use]
    pub fn eq(value: Scalar) -> Self {
        Self {
            operator: "eq".to_string(),
            value,
        }
    }

    #[must_use]
    pub fn operator_kind(&self) -> Option<FilterOperator> {
        FilterOperator::parse(&self.operator)
    }
}

/// Related entity name to the ordered fields requested from it.
pub type ViewSpec = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    pub sort: Vec<SortField>,
    pub filter: BTreeMap<String, FilterPredicate>,
    pub view: ViewSpec,
    pub page: u64,
    pub page_size: u64,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            sort: Vec::new(),
            filter: BTreeMap::new(),
            view: BTreeMap::new(),
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QuerySpec {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sort.is_empty() && self.filter.is_empty() && self.view.is_empty()
    }

    /// `(entity, field)` pairs in entity order, fields in declared order.
    pub fn view_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.view.iter().flat_map(|(entity, fields)| {
            fields
                .iter()
                .map(move |field| (entity.as_str(), field.as_str()))
        })
    }
}
