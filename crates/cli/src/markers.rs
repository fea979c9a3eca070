use protoweave_api::Language;
use protoweave_plugin::{
    FileBoundary, InsertionPoint, InsertionPointPrinter, Plugin, PluginInfo, Renderer,
};
use std::sync::Arc;

/// Marks the start and the end of every file of one language.
pub struct MarkerPlugin {
    language: Language,
}

impl MarkerPlugin {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

impl Plugin for MarkerPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            id: format!("markers-{}", self.language),
            name: "File boundary markers".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: Some(format!(
                "Prints the file_start and file_end markers into {} files",
                self.language
            )),
        }
    }

    fn renderers(&self) -> Vec<Arc<dyn Renderer>> {
        let points: Vec<Arc<dyn InsertionPoint>> =
            vec![Arc::new(FileBoundary::Start), Arc::new(FileBoundary::End)];
        vec![Arc::new(InsertionPointPrinter::new(
            self.language.clone(),
            points,
        ))]
    }
}
