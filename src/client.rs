//! Client
//!
//! Owns one connection and executes command objects on it.

use std::net::TcpStream;

use bytes::Bytes;

use crate::commands::{Command, Get, Ping, Set};
use crate::config::Config;
use crate::error::Result;
use crate::network::{Connection, Transport};

/// Command executor bound to a single connection
pub struct Client<S: Transport = TcpStream> {
    connection: Connection<S>,
}

impl Client<TcpStream> {
    /// Connect using `config`
    pub fn connect(config: &Config) -> Result<Self> {
        Ok(Self::new(Connection::connect_with(config)?))
    }
}

impl<S: Transport> Client<S> {
    pub fn new(connection: Connection<S>) -> Self {
        Self { connection }
    }

    /// Execute any command on the owned connection
    pub fn execute<C: Command>(&mut self, command: &C) -> Result<C::Output> {
        command.execute(&mut self.connection)
    }

    /// Shorthand for [`Ping`]
    pub fn ping(&mut self) -> Result<()> {
        self.execute(&Ping::new())
    }

    /// Shorthand for [`Set`]
    pub fn set(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Result<()> {
        self.execute(&Set::new(key, value))
    }

    /// Shorthand for [`Get`]
    pub fn get(&mut self, key: impl Into<Bytes>) -> Result<Option<Bytes>> {
        self.execute(&Get::new(key))
    }

    pub fn connection(&self) -> &Connection<S> {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut Connection<S> {
        &mut self.connection
    }

    pub fn into_inner(self) -> Connection<S> {
        self.connection
    }
}
