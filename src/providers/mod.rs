pub mod ecb;

pub use ecb::EcbDataProvider;
