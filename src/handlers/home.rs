pub const GREETING: &str = "Welcome to Rolsa Technologies";

/// GET / -> static greeting.
pub async fn home_handler() -> &'static str {
    GREETING
}
