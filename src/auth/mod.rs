// Authentication: token signing, password hashing, cookies and capability checks

pub mod cookie;
pub mod guard;
pub mod jwt;
pub mod password;

pub use guard::Session;
