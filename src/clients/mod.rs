pub mod api_client;
pub mod auth_client;
pub mod profile_client;

pub use api_client::ApiClient;
pub use auth_client::{AuthProvider, SignUpResponse, SupabaseAuthClient};
pub use profile_client::ProfileClient;
