//! intake-persistence: colaboradores de sesión y configuración.
//!
//! - `session`: store clave/valor de strings (memoria o archivo JSON) y el
//!   registro `UserSession` que el shell guarda tras el login.
//! - `config`: resolución de claves con nombre (`.env` + entorno, o estático).
pub mod config;
pub mod error;
pub mod session;

pub use config::{init_dotenv, ConfigProvider, EnvConfig, StaticConfig};
pub use error::{ConfigError, SessionError};
pub use session::{FileSessionStore, InMemorySessionStore, Role, SessionManager, SessionStore, UserSession,
                  SESSION_KEY};
