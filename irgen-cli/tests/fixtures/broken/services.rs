pub trait Broken {
    fn call(&self, request: Request -> Response;
}
