use clap::Args;

/// Print version information.
#[derive(Args, Debug, Clone)]
pub struct Version {}

#[derive(Debug, thiserror::Error)]
pub enum VersionOpError {}

#[async_trait::async_trait]
impl crate::cli::op::Op for Version {
    type Error = VersionOpError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        Ok(format!("keepsake {}", env!("CARGO_PKG_VERSION")))
    }
}
