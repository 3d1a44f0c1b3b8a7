pub mod trajectory;

#[cfg(feature = "viewer")]
pub mod replay;
