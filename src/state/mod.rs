pub mod config;
pub mod context;
pub mod persistence;

pub use config::{ConfigError, EditorConfig};
pub use context::{EditorContext, MountGuard};
pub use persistence::{
    ChangeForwarder,
    PersistenceBridge,
    PersistenceError,
    PersistenceResult,
    SceneDocument,
};
