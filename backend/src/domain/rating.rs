//! Running-average rating aggregation.

use crate::domain::{Rating, User};

/// Fold one approved completion into `user`'s track record.
///
/// The new average is `(old * count + rating) / (count + 1)`, clamped to the
/// rating range. Call exactly once per approved completion.
///
/// # Examples
/// ```
/// use marketplace::domain::{Rating, rating::record_completion};
/// # use marketplace::domain::{EmailAddress, NewUser, PasswordHash, PhoneNumber, User, UserId, UserName};
/// # let user = User::new(NewUser {
/// #     id: UserId::random(),
/// #     name: UserName::new("Ada").unwrap(),
/// #     email: EmailAddress::new("ada@example.com").unwrap(),
/// #     password_hash: PasswordHash::new("digest").unwrap(),
/// #     phone_number: PhoneNumber::new("555").unwrap(),
/// # })
/// # .with_track_record(Rating::new(4.0).unwrap(), 1);
/// let updated = record_completion(user, Rating::new(5.0).unwrap());
/// assert_eq!(updated.rating().value(), 4.5);
/// assert_eq!(updated.completed_jobs(), 2);
/// ```
#[must_use]
pub fn record_completion(user: User, rating: Rating) -> User {
    let count = user.completed_jobs();
    let total = user.rating().value() * f64::from(count) + rating.value();
    let next_count = count.saturating_add(1);
    let average = Rating::saturating(total / f64::from(next_count));
    user.with_track_record(average, next_count)
}
