#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod assets;
pub mod command;
pub mod element;
pub mod event;
pub mod export;
pub mod file_handler;
pub mod geometry;
pub mod id_generator;
pub mod input;
pub mod panels;
pub mod renderer;
pub mod scene;
pub mod state;
pub mod style;
pub mod tools;
pub mod viewport;

pub use app::WhiteboardApp;
pub use assets::{AssetError, AssetKind, AssetLoader, AssetRequest, AssetSource};
pub use command::{Command, CommandError, CommandHistory, CommandResult};
pub use element::{factory, Element, ElementType};
pub use event::{SceneEvent, SceneObserver};
pub use id_generator::ElementId;
pub use input::{EditorAction, InputEvent, InputHandler, InputLocation, KeyBindings};
pub use renderer::Renderer;
pub use scene::Scene;
pub use state::{EditorConfig, EditorContext, MountGuard, PersistenceError, SceneDocument};
pub use style::{BrushSettings, Color, ColorTarget, StyleDefaults, StylePatch};
pub use tools::{Tool, ToolKind};
pub use viewport::Viewport;
