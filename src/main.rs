use referral_notify::configuration::get_configuration;
use referral_notify::push::{FcmPushGateway, PushGateway};
use referral_notify::startup::Application;
use referral_notify::tasks::{CloudTasksQueue, TaskQueue};
use referral_notify::telemetry::{get_subscriber, init_subscriber};
use std::sync::Arc;

#[rocket::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("referral-notify".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration.");
    let push_gateway: Arc<dyn PushGateway> =
        Arc::new(FcmPushGateway::new(&configuration.push_gateway)?);
    let task_queue: Arc<dyn TaskQueue> =
        Arc::new(CloudTasksQueue::new(&configuration.task_queue)?);

    let app = Application::build(&configuration, push_gateway, task_queue).await?;
    app.server.launch().await?;
    Ok(())
}
