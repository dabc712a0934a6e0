pub mod compare;
pub mod encode;
pub mod receive;
pub mod send;
pub mod verify;
