//! URL opener for terminal use: "opening" a link prints it.

use async_trait::async_trait;
use medfind_discovery::{LinkError, UrlOpener};

/// Treats native deep links as openable only when told a handler exists.
pub struct ConsoleOpener {
    native_handler: bool,
}

impl ConsoleOpener {
    pub fn new(native_handler: bool) -> Self {
        Self { native_handler }
    }
}

#[async_trait]
impl UrlOpener for ConsoleOpener {
    async fn can_open(&self, url: &str) -> Result<bool, LinkError> {
        Ok(url.starts_with("https://") || self.native_handler)
    }

    async fn open(&self, url: &str) -> Result<(), LinkError> {
        println!("{url}");
        Ok(())
    }
}
