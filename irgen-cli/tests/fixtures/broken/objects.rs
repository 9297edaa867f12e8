pub struct Request {
    pub callback: fn(u32) -> u32,
}

pub struct Response;
