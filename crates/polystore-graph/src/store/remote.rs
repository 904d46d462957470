//! Remote-protocol graph backend
//!
//! Holds the resolved endpoint and connection settings. When the descriptor
//! asks for verification the protocol handshake runs at connect time, so a
//! dead or incompatible endpoint is a startup failure rather than a latent
//! one. The data and transaction planes are not wired to a remote driver
//! yet and report as such.

use std::collections::BTreeMap;
use std::time::Duration;

use polystore_core::config::{ConnectionDescriptor, EncryptionLevel};
use polystore_core::{PsError, PsErrorKind, Result};

use super::Node;
use crate::bolt::{self, BoltEndpoint};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct RemoteGraph {
    endpoint: BoltEndpoint,
    #[allow(dead_code)]
    encryption: EncryptionLevel,
    #[allow(dead_code)]
    pool_size: u32,
    has_credentials: bool,
}

impl RemoteGraph {
    pub fn connect(descriptor: &ConnectionDescriptor) -> Result<Self> {
        let uri = descriptor.uri.as_deref().ok_or_else(|| {
            PsError::new(PsErrorKind::Configuration)
                .with_op("connect")
                .with_resource("graph")
                .with_message("remote scheme resolved without a URI")
        })?;
        let endpoint = BoltEndpoint::parse(uri).map_err(|e| {
            PsError::new(PsErrorKind::Configuration)
                .with_op("connect")
                .with_resource("graph")
                .with_message(e.to_string())
        })?;

        if descriptor.verify_on_connect {
            let version = bolt::handshake(&endpoint, CONNECT_TIMEOUT).map_err(|e| {
                PsError::new(PsErrorKind::Connection)
                    .with_op("verify_connection")
                    .with_resource("graph")
                    .with_message(format!(
                        "endpoint {}:{} failed verification: {}",
                        endpoint.host, endpoint.port, e
                    ))
            })?;
            tracing::info!(
                host = %endpoint.host,
                port = endpoint.port,
                protocol_version = version,
                "remote graph endpoint verified"
            );
        }

        Ok(Self {
            endpoint,
            encryption: descriptor.encryption,
            pool_size: descriptor.pool_size,
            has_credentials: descriptor.credentials.is_some(),
        })
    }

    pub fn endpoint(&self) -> &BoltEndpoint {
        &self.endpoint
    }

    pub fn has_credentials(&self) -> bool {
        self.has_credentials
    }

    fn unimplemented(&self, op: &str) -> PsError {
        PsError::new(PsErrorKind::NotImplemented)
            .with_op(op)
            .with_resource("graph")
            .with_message(format!(
                "remote driver for {}:{} does not support data operations yet",
                self.endpoint.host, self.endpoint.port
            ))
    }

    pub fn create_node(
        &self,
        _label: &str,
        _properties: BTreeMap<String, serde_json::Value>,
    ) -> Result<Node> {
        Err(self.unimplemented("create_node"))
    }

    pub fn put_node(&self, _node: &Node) -> Result<()> {
        Err(self.unimplemented("put_node"))
    }

    pub fn node_by_id(&self, _id: u64) -> Result<Option<Node>> {
        Err(self.unimplemented("node_by_id"))
    }

    pub fn nodes_with_label(&self, _label: &str) -> Result<Vec<Node>> {
        Err(self.unimplemented("nodes_with_label"))
    }

    pub fn find_by_property(
        &self,
        _label: &str,
        _key: &str,
        _value: &serde_json::Value,
    ) -> Result<Vec<Node>> {
        Err(self.unimplemented("find_by_property"))
    }

    pub fn delete_all(&self, _label: &str) -> Result<()> {
        Err(self.unimplemented("delete_all"))
    }

    pub fn begin_tx(&self) -> Result<()> {
        Err(self.unimplemented("begin"))
    }

    pub fn commit_tx(&self) -> Result<()> {
        Err(self.unimplemented("commit"))
    }

    pub fn rollback_tx(&self) -> Result<()> {
        Err(self.unimplemented("rollback"))
    }
}
