/// Helper for testing the identity provider client using wiremock.
///
/// Warning: when using `Mock::expect` ensure `server` is not dropped before the test completes,
/// the expectations are only verified when the server is dropped.
pub async fn start_provider_mock(mocks: Vec<wiremock::Mock>) -> wiremock::MockServer {
    let server = wiremock::MockServer::start().await;

    for mock in mocks {
        server.register(mock).await;
    }

    server
}
