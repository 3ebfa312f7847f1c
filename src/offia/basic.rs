//! WeChat server IP lists

use serde::Deserialize;

use crate::wx::Action;

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct IpList {
    #[serde(default)]
    pub ip_list: Vec<String>,
}

/// Egress IPs of the API domain (`/cgi-bin/get_api_domain_ip`)
pub fn get_api_domain_ip() -> Action<IpList> {
    Action::get("/cgi-bin/get_api_domain_ip")
}

/// Source IPs WeChat uses when pushing callbacks (`/cgi-bin/getcallbackip`)
pub fn get_callback_ip() -> Action<IpList> {
    Action::get("/cgi-bin/getcallbackip")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wx::RawResponse;

    #[test]
    fn test_ip_list_actions() {
        assert_eq!(get_api_domain_ip().path(), "/cgi-bin/get_api_domain_ip");
        let list = get_callback_ip()
            .decode(RawResponse::json(
                r#"{"ip_list":["101.226.62.77","101.226.62.78"]}"#,
            ))
            .unwrap();
        assert_eq!(list.ip_list.len(), 2);
    }
}
