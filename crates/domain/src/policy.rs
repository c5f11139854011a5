//! Ownership-based access policy.

use store::{Book, User};

/// The actor behind a request: either an authenticated user or nobody.
///
/// Authentication itself happens upstream; by the time a request
/// reaches the domain layer the principal is already resolved.
#[derive(Debug, Clone)]
pub enum Principal {
    Anonymous,
    User(User),
}

impl Principal {
    /// The authenticated user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Principal::Anonymous => None,
            Principal::User(user) => Some(user),
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Principal::User(user) if user.is_staff)
    }
}

/// Whether the principal may mutate the given book.
///
/// Reads are always permitted and never consult this function. Writes
/// are permitted iff the principal is staff, or is authenticated and
/// owns the book. A book without an owner is only writable by staff.
pub fn can_write(principal: &Principal, book: &Book) -> bool {
    match principal {
        Principal::Anonymous => false,
        Principal::User(user) => user.is_staff || book.owner_id == Some(user.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{BookId, UserId};
    use rust_decimal::Decimal;

    fn user(is_staff: bool) -> User {
        User {
            id: UserId::new(),
            username: "someone".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff,
        }
    }

    fn book(owner_id: Option<UserId>) -> Book {
        Book {
            id: BookId::new(),
            name: "Test book 1".to_string(),
            price: Decimal::new(1000, 2),
            author_name: "Author 1".to_string(),
            owner_id,
            discount: 0,
            rating: None,
        }
    }

    #[test]
    fn owner_can_write() {
        let owner = user(false);
        let book = book(Some(owner.id));
        assert!(can_write(&Principal::User(owner), &book));
    }

    #[test]
    fn non_owner_cannot_write() {
        let owner = user(false);
        let other = user(false);
        let book = book(Some(owner.id));
        assert!(!can_write(&Principal::User(other), &book));
    }

    #[test]
    fn staff_can_write_any_book() {
        let staff = user(true);
        let someone_elses = book(Some(UserId::new()));
        assert!(can_write(&Principal::User(staff.clone()), &someone_elses));
        assert!(can_write(&Principal::User(staff), &book(None)));
    }

    #[test]
    fn anonymous_cannot_write() {
        assert!(!can_write(&Principal::Anonymous, &book(None)));
    }

    #[test]
    fn ownerless_book_is_not_writable_by_regular_users() {
        let regular = user(false);
        assert!(!can_write(&Principal::User(regular), &book(None)));
    }
}
