use fantoccini::{Client, ClientBuilder};

pub struct WebDriverClient {
    pub client: Client,
}

impl WebDriverClient {
    pub async fn connect(url: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = ClientBuilder::native()
            .connect(url)
            .await
            .map_err(|e| format!("Failed to connect to WebDriver at {}: {}", url, e))?;

        Ok(Self { client })
    }

    pub async fn close(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.client
            .close()
            .await
            .map_err(|e| format!("Failed to close session: {}", e))?;
        Ok(())
    }
}

/// WebDriver executes function bodies, so an expression has to be returned
/// explicitly.
pub fn wrap_expression(expression: &str) -> String {
    let trimmed = expression.trim().trim_end_matches(';').trim_end();
    format!("return ({});", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expressions_are_returned() {
        assert_eq!(wrap_expression("1 + 1"), "return (1 + 1);");
        assert_eq!(
            wrap_expression("\n(() => { return 2; })();\n"),
            "return ((() => { return 2; })());"
        );
    }
}
