use rust_decimal::Decimal;

/// Sort order for book listings.
///
/// Parsed from the `ordering` query parameter, where a leading `-`
/// means descending (`price`, `-price`, `author_name`, `-author_name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookOrdering {
    PriceAsc,
    PriceDesc,
    AuthorNameAsc,
    AuthorNameDesc,
}

impl BookOrdering {
    /// Parses the wire form of the ordering parameter.
    ///
    /// Returns `None` for unrecognized values so the caller can reject
    /// them instead of silently ignoring the parameter.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "price" => Some(Self::PriceAsc),
            "-price" => Some(Self::PriceDesc),
            "author_name" => Some(Self::AuthorNameAsc),
            "-author_name" => Some(Self::AuthorNameDesc),
            _ => None,
        }
    }
}

/// Filtering, searching, and ordering options for book listings.
///
/// All fields are optional; the default query returns the whole
/// catalog in id order.
#[derive(Debug, Clone, Default)]
pub struct BookQuery {
    /// Exact-match price filter.
    pub price: Option<Decimal>,
    /// Case-insensitive substring match over `name` OR `author_name`.
    pub search: Option<String>,
    pub ordering: Option<BookOrdering>,
}

impl BookQuery {
    /// A query returning every book in id order.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    pub fn with_ordering(mut self, ordering: BookOrdering) -> Self {
        self.ordering = Some(ordering);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_orderings() {
        assert_eq!(BookOrdering::parse("price"), Some(BookOrdering::PriceAsc));
        assert_eq!(BookOrdering::parse("-price"), Some(BookOrdering::PriceDesc));
        assert_eq!(
            BookOrdering::parse("author_name"),
            Some(BookOrdering::AuthorNameAsc)
        );
        assert_eq!(
            BookOrdering::parse("-author_name"),
            Some(BookOrdering::AuthorNameDesc)
        );
    }

    #[test]
    fn rejects_unknown_ordering() {
        assert_eq!(BookOrdering::parse("rating"), None);
        assert_eq!(BookOrdering::parse(""), None);
    }
}
