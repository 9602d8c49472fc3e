pub mod python;
pub mod types;

use anyhow::Result;

pub use types::{ConvertIn, ConvertOut, EngineDiag};

/// The delegation boundary: everything format-aware lives on the other side.
pub trait Engine: Send + Sync {
    fn doctor(&self) -> Result<EngineDiag>;
    fn convert(&self, req: &ConvertIn) -> Result<ConvertOut>;
}

impl Engine for Box<dyn Engine> {
    fn doctor(&self) -> Result<EngineDiag> {
        self.as_ref().doctor()
    }

    fn convert(&self, req: &ConvertIn) -> Result<ConvertOut> {
        self.as_ref().convert(req)
    }
}
