use serde::Deserialize;

/// Token API paths, one per client operation.
///
/// Deserialized per key, so a config file may override a single path and
/// keep the console defaults for the rest. Unknown keys are an error.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointRegistry {
    pub list: String,
    pub create: String,
    pub delete: String,
    pub curl: String,
    pub update_status: String,
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self {
            list: "/token/list".to_owned(),
            create: "/token/create".to_owned(),
            delete: "/token/delete".to_owned(),
            curl: "/token/curl".to_owned(),
            update_status: "/token/toggle".to_owned(),
        }
    }
}

impl EndpointRegistry {
    /// (key, path) pairs in the order the keys are documented.
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("LIST", self.list.as_str()),
            ("CREATE", self.create.as_str()),
            ("DELETE", self.delete.as_str()),
            ("CURL", self.curl.as_str()),
            ("UPDATE_STATUS", self.update_status.as_str()),
        ]
    }
}
