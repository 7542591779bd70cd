// ==========================================
// SNAC 数据上传工具 - SNAC 环境
// ==========================================
// 职责: 环境标识、Web/API 地址、API Key、实体链接拼接
// ==========================================

use serde::{Deserialize, Serialize};

pub const DEV_ENVIRONMENT_ID: &str = "dev";
pub const PROD_ENVIRONMENT_ID: &str = "prod";

/// SNAC 环境
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnacEnvironment {
    pub id: String,
    pub name: String,
    pub web_url: String,
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
}

impl SnacEnvironment {
    pub fn development() -> Self {
        Self {
            id: DEV_ENVIRONMENT_ID.to_string(),
            name: "Development".to_string(),
            web_url: "https://snac-dev.iath.virginia.edu/".to_string(),
            api_url: "https://snac-dev.iath.virginia.edu/api/".to_string(),
            api_key: String::new(),
        }
    }

    pub fn production() -> Self {
        Self {
            id: PROD_ENVIRONMENT_ID.to_string(),
            name: "Production".to_string(),
            web_url: "https://snaccooperative.org/".to_string(),
            api_url: "https://api.snaccooperative.org/".to_string(),
            api_key: String::new(),
        }
    }

    pub fn is_prod(&self) -> bool {
        self.id.eq_ignore_ascii_case(PROD_ENVIRONMENT_ID)
    }

    pub fn url_for_constellation(&self, id: i64) -> String {
        format!("{}view/{}", self.web_url, id)
    }

    pub fn url_for_resource(&self, id: i64) -> String {
        format!("{}vocab_administrator/resources/{}", self.web_url, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_urls() {
        let env = SnacEnvironment::development();
        assert_eq!(
            env.url_for_constellation(42),
            "https://snac-dev.iath.virginia.edu/view/42"
        );
        assert_eq!(
            env.url_for_resource(7),
            "https://snac-dev.iath.virginia.edu/vocab_administrator/resources/7"
        );
    }

    #[test]
    fn test_is_prod() {
        assert!(SnacEnvironment::production().is_prod());
        assert!(!SnacEnvironment::development().is_prod());

        let mut env = SnacEnvironment::development();
        env.id = "PROD".to_string();
        assert!(env.is_prod());
    }
}
