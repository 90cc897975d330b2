//! Blocking JSON-RPC 1.1 client for the workspace object store.

use anyhow::{anyhow, bail, ensure, Context, Result};
use ar_types::{
    ObjectData, ObjectInfo, ObjectSpecification, ObjectStore, RequestContext, SaveObjectsParams,
};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const SERVICE: &str = "Workspace";

#[derive(Serialize)]
struct RpcRequest<'a, P> {
    version: &'static str,
    method: String,
    params: P,
    id: &'a str,
}

#[derive(Deserialize, Debug)]
struct RpcError {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    /// Server side stack trace
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

/// Decode the body of a JSON-RPC response. Methods return a one element list.
fn parse_response<R: DeserializeOwned>(method: &str, body: &str) -> Result<R> {
    let response: RpcResponse = serde_json::from_str(body)
        .with_context(|| format!("{method}: response is not a JSON-RPC reply: {body}"))?;
    if let Some(err) = response.error {
        if let Some(trace) = &err.error {
            debug!("{method} server trace:\n{trace}");
        }
        bail!(
            "{method} failed: {} (code {}): {}",
            err.name.as_deref().unwrap_or("JSONRPCError"),
            err.code.unwrap_or(0),
            err.message.as_deref().unwrap_or("no message")
        );
    }
    let result = response
        .result
        .ok_or_else(|| anyhow!("{method}: reply has neither result nor error"))?;
    let (first,): (R,) = serde_json::from_value(result)
        .with_context(|| format!("{method}: unexpected result shape"))?;
    Ok(first)
}

/// An [`ObjectStore`] backed by a workspace service URL.
pub struct WorkspaceClient {
    url: String,
    client: Client,
}

impl WorkspaceClient {
    pub fn new(url: &str, timeout: Option<Duration>) -> Result<Self> {
        ensure!(!url.is_empty(), "workspace URL is empty");
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(WorkspaceClient {
            url: url.to_string(),
            client: builder.build()?,
        })
    }

    fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        method: &str,
        params: P,
    ) -> Result<R> {
        let method = format!("{SERVICE}.{method}");
        let id = uuid::Uuid::new_v4().to_string();
        let request = RpcRequest {
            version: "1.1",
            method: method.clone(),
            params,
            id: &id,
        };
        debug!("POST {} {method}", self.url);
        let mut http = self.client.post(&self.url).json(&request);
        if let Some(token) = &ctx.token {
            http = http.header(AUTHORIZATION, token);
        }
        let response = http
            .send()
            .with_context(|| format!("{method}: request to {} failed", self.url))?;
        let status = response.status();
        let body = response
            .text()
            .with_context(|| format!("{method}: reading response"))?;
        // errors come back as HTTP 500 with a JSON-RPC error body
        match parse_response(&method, &body) {
            Err(e) if !status.is_success() => Err(e.context(format!("HTTP {status}"))),
            res => res,
        }
    }
}

impl ObjectStore for WorkspaceClient {
    fn get_objects(
        &self,
        ctx: &RequestContext,
        objects: &[ObjectSpecification],
    ) -> Result<Vec<ObjectData>> {
        self.call(ctx, "get_objects", (objects,))
    }

    fn save_objects(
        &self,
        ctx: &RequestContext,
        params: &SaveObjectsParams,
    ) -> Result<Vec<ObjectInfo>> {
        self.call(ctx, "save_objects", (params,))
    }
}
