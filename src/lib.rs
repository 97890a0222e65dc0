#[macro_use]
extern crate serde_derive;
#[macro_use(Message, MessageResponse)]
extern crate actix_derive;
extern crate colored;

pub mod chain;
pub mod inventory;
pub mod join;
pub mod message;
pub mod p2p;
pub mod protocol;
pub mod server;
pub mod session;
pub mod storage;
pub mod zfx_id;

#[cfg(test)]
mod testing;

#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    Sled(sled::Error),
    Bincode(String),
    Actix(actix::MailboxError),
    Config(String),

    // channel errors
    ChannelStopped,
    Timeout,

    // pipeline errors
    Connect(String),
    Handshake(String),
    AddressExchange(String),
    InvalidTransition,

    // join errors
    JoinOverflow,
    EmptyJoin,

    // session errors
    OperationFailed,
    AlreadyStarted,
    NoRuntime,

    // lookup errors
    NotFound,

    /// Error caused by converting from a `String` to an `Id`
    TryFromStringError,
    /// Error when parsing a seed description `HOST:PORT`
    PeerParseError,
}

impl std::error::Error for Error {}

impl std::convert::From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IO(error)
    }
}

impl std::convert::From<sled::Error> for Error {
    fn from(error: sled::Error) -> Self {
        Error::Sled(error)
    }
}

impl std::convert::From<Box<bincode::ErrorKind>> for Error {
    fn from(error: Box<bincode::ErrorKind>) -> Self {
        Error::Bincode(format!("{:?}", error))
    }
}

impl std::convert::From<actix::MailboxError> for Error {
    fn from(error: actix::MailboxError) -> Self {
        Error::Actix(error)
    }
}

impl std::convert::From<config::ConfigError> for Error {
    fn from(error: config::ConfigError) -> Self {
        Error::Config(format!("{}", error))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
