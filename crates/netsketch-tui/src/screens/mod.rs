//! The two panels of the main window.

pub mod canvas;
pub mod properties;

pub use canvas::CanvasScreen;
pub use properties::PropertiesPanel;
