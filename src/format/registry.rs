//! Format registry for discovering and accessing annotation formats.

use std::collections::HashMap;

use crate::format::formats::{CocoKeypointFormat, CreateMlFormat};
use crate::format::traits::AnnotationFormat;

/// Id of the native format, which stores both boxes and poses.
pub const NATIVE_FORMAT_ID: &str = "createml";

/// Registry of available annotation formats.
///
/// All built-in formats are registered automatically on creation.
pub struct FormatRegistry {
    formats: HashMap<&'static str, Box<dyn AnnotationFormat>>,
}

impl FormatRegistry {
    /// Create a new registry with all built-in formats registered.
    pub fn new() -> Self {
        let mut registry = Self {
            formats: HashMap::new(),
        };

        registry.register(Box::new(CreateMlFormat::new()));
        registry.register(Box::new(CocoKeypointFormat));

        registry
    }

    /// Register a format implementation, replacing any with the same id.
    pub fn register(&mut self, format: Box<dyn AnnotationFormat>) {
        self.formats.insert(format.id(), format);
    }

    /// Get a format by its ID.
    pub fn get(&self, id: &str) -> Option<&dyn AnnotationFormat> {
        self.formats.get(id).map(|f| f.as_ref())
    }

    /// Find formats by file extension.
    pub fn by_extension(&self, ext: &str) -> Vec<&dyn AnnotationFormat> {
        self.formats
            .values()
            .filter(|f| f.extensions().iter().any(|e| e.ends_with(ext)))
            .map(|f| f.as_ref())
            .collect()
    }

    /// Get all registered formats.
    pub fn all(&self) -> Vec<&dyn AnnotationFormat> {
        self.formats.values().map(|f| f.as_ref()).collect()
    }

    /// Get all format IDs.
    pub fn ids(&self) -> Vec<&'static str> {
        self.formats.keys().copied().collect()
    }

    /// Get the native format, if it is registered.
    pub fn native(&self) -> Option<&dyn AnnotationFormat> {
        self.get(NATIVE_FORMAT_ID)
    }

    /// Get formats that can store labeled boxes.
    pub fn shape_formats(&self) -> Vec<&dyn AnnotationFormat> {
        self.all()
            .into_iter()
            .filter(|f| f.supports_shapes())
            .collect()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
