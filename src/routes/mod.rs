/// Router Module Index
///
/// Groups the marketplace pages by who may reach them. The grouping mirrors the
/// gate's route table; the gate itself is applied once, over the whole router.

/// Pages anyone may open, including the login and registration pages.
pub mod public;

/// Pages for any signed-in caller: profile, password change, listing detail.
pub mod private;

/// Role dashboards (admin, landlord, tenant).
pub mod dashboard;
