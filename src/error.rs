use derive_more::{Display, From};

use crate::color::PacketError;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Display, From)]
pub enum Error {
    // -- Domain
    #[from]
    #[display("colorimeter packet: {_0}")]
    Packet(PacketError),

    // -- Externals
    #[from]
    #[display("I/O: {_0}")]
    Io(std::io::Error),
    #[from]
    #[display("image: {_0}")]
    Image(image::error::ImageError),
    #[from]
    #[display("PNG encoding: {_0}")]
    Png(png::EncodingError),
    #[from]
    #[display("JSON: {_0}")]
    Json(serde_json::Error),
}

impl std::error::Error for Error {}
