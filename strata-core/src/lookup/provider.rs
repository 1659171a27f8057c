use super::error::ProviderError;
use crate::compiler::SourceUnit;

/// Supplies units that are referenced but were not part of the batch
pub trait UnitProvider {
    /// Find the unit declaring `qualified_name`, e.g. `geo.Point`
    fn find_unit(&mut self, qualified_name: &str) -> Result<Option<SourceUnit>, ProviderError>;
}

impl<F> UnitProvider for F
where
    F: FnMut(&str) -> Result<Option<SourceUnit>, ProviderError>,
{
    fn find_unit(&mut self, qualified_name: &str) -> Result<Option<SourceUnit>, ProviderError> {
        self(qualified_name)
    }
}
