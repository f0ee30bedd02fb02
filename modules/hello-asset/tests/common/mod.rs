#![allow(dead_code)]

use assetkit_utils::SecretString;
use hello_asset::{PlatformConfig, ProbeConfig, ProbeContext, ProbeHttpConfig, ProbeService};
use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::json;

pub const ADMIN_TOKEN: &str = "admin-tok";
pub const WORKFLOW_TOKEN: &str = "workflow-tok";

/// Mock UAA and asset service plus a context resolved against them.
pub struct Upstreams {
    pub uaa: MockServer,
    pub asset: MockServer,
}

impl Upstreams {
    pub fn start() -> Self {
        Self {
            uaa: MockServer::start(),
            asset: MockServer::start(),
        }
    }

    pub fn probe_config() -> ProbeConfig {
        ProbeConfig {
            service_name: "predix-asset".into(),
            service_plan: "Tiered".into(),
            client_id: "hello-asset".into(),
            client_secret: SecretString::new("s3cr3t"),
            admin_client_secret: SecretString::new("adm1n"),
            http: ProbeHttpConfig {
                allow_insecure_http: true,
                ..ProbeHttpConfig::default()
            },
            ..ProbeConfig::default()
        }
    }

    pub fn vcap_services(&self) -> serde_json::Value {
        json!({
            "predix-asset": [{
                "name": "my-asset",
                "label": "predix-asset",
                "credentials": {
                    "uri": self.asset.base_url(),
                    "zone": {
                        "oauth-scope": "predix-asset.zones.zone-1.user",
                        "http-header-name": "Predix-Zone-Id",
                        "http-header-value": "zone-1"
                    }
                }
            }],
            "predix-uaa": [{
                "name": "my-uaa",
                "label": "predix-uaa",
                "credentials": {
                    "uri": self.uaa.base_url(),
                    "issuerId": self.uaa.url("/oauth/token"),
                    "subdomain": "sub"
                }
            }]
        })
    }

    pub fn context_from(&self, services: &serde_json::Value) -> ProbeContext {
        let platform = PlatformConfig {
            vcap_services: Some(services.to_string()),
            vcap_application: Some(
                json!({
                    "application_name": "hello-asset",
                    "application_uris": ["hello-asset.example.com"]
                })
                .to_string(),
            ),
        };
        hello_asset::resolve(&Self::probe_config(), &platform).unwrap()
    }

    pub fn service(&self) -> ProbeService {
        self.service_from(&self.vcap_services())
    }

    pub fn service_from(&self, services: &serde_json::Value) -> ProbeService {
        ProbeService::new(self.context_from(services), Self::probe_config().http)
    }

    pub fn mock_admin_token(&self) -> Mock<'_> {
        self.mock_admin_token_lasting(3600)
    }

    pub fn mock_admin_token_lasting(&self, expires_in: u64) -> Mock<'_> {
        self.uaa.mock(|when, then| {
            when.method(POST)
                .path("/oauth/token")
                .header("authorization", "Basic YWRtaW46YWRtMW4=")
                .body_includes("scope=zones.sub.admin+clients.read");
            then.status(200).json_body(json!({
                "access_token": ADMIN_TOKEN,
                "token_type": "bearer",
                "expires_in": expires_in
            }));
        })
    }

    pub fn mock_workflow_token(&self, status: u16) -> Mock<'_> {
        self.mock_workflow_token_lasting(status, 3600)
    }

    pub fn mock_workflow_token_lasting(&self, status: u16, expires_in: u64) -> Mock<'_> {
        self.uaa.mock(|when, then| {
            when.method(POST).path("/oauth/token").body(
                "grant_type=client_credentials\
                 &scope=predix-asset.zones.zone-1.user+scim.me+uaa.resource+openid",
            );
            then.status(status).json_body(json!({
                "access_token": WORKFLOW_TOKEN,
                "token_type": "bearer",
                "expires_in": expires_in
            }));
        })
    }

    pub fn mock_delete_client(&self, status: u16) -> Mock<'_> {
        self.uaa.mock(|when, then| {
            when.method(DELETE)
                .path("/oauth/clients/hello-asset")
                .header("authorization", format!("Bearer {ADMIN_TOKEN}"));
            then.status(status).body("{}");
        })
    }

    pub fn mock_create_client(&self, status: u16) -> Mock<'_> {
        self.uaa.mock(|when, then| {
            when.method(POST)
                .path("/oauth/clients")
                .header("authorization", format!("Bearer {ADMIN_TOKEN}"))
                .json_body_includes(r#"{"client_id":"hello-asset"}"#);
            then.status(status).body(r#"{"client_id":"hello-asset"}"#);
        })
    }

    pub fn mock_post_asset(&self, status: u16) -> Mock<'_> {
        self.asset.mock(|when, then| {
            when.method(POST)
                .path("/assets")
                .header("authorization", format!("Bearer {WORKFLOW_TOKEN}"))
                .header("predix-zone-id", "zone-1")
                .json_body(json!([{
                    "id": "simpleId",
                    "serialNo": "simple_serial",
                    "description": "Simple Asset",
                    "uri": "/assets/simple"
                }]));
            then.status(status);
        })
    }

    pub fn mock_list_assets(&self, status: u16, body: &str) -> Mock<'_> {
        let body = body.to_owned();
        self.asset.mock(move |when, then| {
            when.method(GET)
                .path("/assets")
                .header("authorization", format!("Bearer {WORKFLOW_TOKEN}"))
                .header("predix-zone-id", "zone-1");
            then.status(status)
                .header("content-type", "application/json")
                .body(body);
        })
    }

    /// Every upstream call of a successful run.
    pub fn mock_happy_path(&self, listing: &str) -> HappyPath<'_> {
        HappyPath {
            admin_token: self.mock_admin_token(),
            workflow_token: self.mock_workflow_token(200),
            delete: self.mock_delete_client(404),
            create: self.mock_create_client(201),
            post: self.mock_post_asset(201),
            list: self.mock_list_assets(200, listing),
        }
    }
}

pub struct HappyPath<'a> {
    pub admin_token: Mock<'a>,
    pub workflow_token: Mock<'a>,
    pub delete: Mock<'a>,
    pub create: Mock<'a>,
    pub post: Mock<'a>,
    pub list: Mock<'a>,
}

pub fn listing(ids: &[&str]) -> String {
    let records: Vec<_> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "serialNo": "s",
                "description": "d",
                "uri": format!("/assets/{id}")
            })
        })
        .collect();
    serde_json::Value::Array(records).to_string()
}
