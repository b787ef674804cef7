// Lambda entry point; deployed as `bootstrap` on the provided runtime.

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    marketdesk_lambda::run().await
}
