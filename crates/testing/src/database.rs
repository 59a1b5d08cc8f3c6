//! Throwaway MongoDB servers for integration tests.
//!
//! Requires Docker. Tests using this are marked `#[ignore]`.

use testcontainers::{clients::Cli, core::WaitFor, Container, GenericImage};

const MONGO_PORT: u16 = 27017;

/// A running `mongo` container, stopped when dropped
pub struct MongoContainer<'d> {
    container: Container<'d, GenericImage>,
}

impl<'d> MongoContainer<'d> {
    pub fn start(docker: &'d Cli) -> Self {
        let image = GenericImage::new("mongo", "7.0")
            .with_exposed_port(MONGO_PORT)
            .with_wait_for(WaitFor::message_on_stdout("Waiting for connections"));
        Self {
            container: docker.run(image),
        }
    }

    /// Connection string for the mapped host port
    pub fn url(&self) -> String {
        format!(
            "mongodb://127.0.0.1:{}",
            self.container.get_host_port_ipv4(MONGO_PORT)
        )
    }
}

/// A database name unlikely to collide with parallel tests
pub fn unique_database_name(prefix: &str) -> String {
    format!("{}_{}", prefix, bson::oid::ObjectId::new().to_hex())
}
