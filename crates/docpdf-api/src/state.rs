use docpdf_core::Config;
use docpdf_processing::{DocumentConverter, DocumentValidator, ScratchSpace};
use std::sync::Arc;

/// Shared application state handed to every handler.
pub struct AppState {
    pub config: Config,
    pub validator: DocumentValidator,
    pub scratch: ScratchSpace,
    pub converter: Arc<dyn DocumentConverter>,
}

impl AppState {
    pub fn new(config: Config, converter: Arc<dyn DocumentConverter>) -> Self {
        let scratch = ScratchSpace::new(config.upload_dir(), config.converted_dir());
        Self {
            config,
            validator: DocumentValidator::new(),
            scratch,
            converter,
        }
    }
}
