// Concrete implementations of the domain ports: files, HTTP collaborators, camera sources, console output.

pub mod camera;
pub mod console;
pub mod http;
pub mod storage;
