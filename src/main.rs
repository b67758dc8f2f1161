#[cfg(target_arch = "wasm32")]
pub fn main() {
    authdash::start();
}

#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
