use clap::Args;

use common::entry::TYPE_CATALOG;

/// Show the available entry types.
#[derive(Args, Debug, Clone)]
pub struct Types {}

#[derive(Debug, thiserror::Error)]
pub enum TypesOpError {}

#[async_trait::async_trait]
impl crate::cli::op::Op for Types {
    type Error = TypesOpError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        Ok(TYPE_CATALOG.to_string())
    }
}
