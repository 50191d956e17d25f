use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read the {clock} clock")]
    Clock {
        clock: &'static str,
        #[source]
        source: io::Error,
    },
}
