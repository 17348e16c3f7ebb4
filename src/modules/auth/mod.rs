pub mod crud;
pub mod interface;
pub mod middleware;
pub mod model;

pub use crud::MySqlUserRepository;
pub use interface::{RepositoryError, UserRepository};
pub use middleware::{bearer_token, AuthUser};
pub use model::{TwoFactorState, User};
