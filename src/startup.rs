use crate::catchers::*;
use crate::configuration::Settings;
use crate::push::PushGateway;
use crate::routes::*;
use crate::scheduler::ReminderContext;
use crate::tasks::TaskQueue;
use rocket::fairing::Info;
use rocket::{Ignite, Orbit, Rocket};
use rocket_sync_db_pools::database;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

#[database("notifications")]
pub struct NotifyDbConn(diesel::PgConnection);

pub struct Application {
    pub server: Rocket<Ignite>,
    pub port: BoundPort,
}

impl Application {
    pub async fn build(
        configuration: &Settings,
        push_gateway: Arc<dyn PushGateway>,
        task_queue: Arc<dyn TaskQueue>,
    ) -> Result<Application, anyhow::Error> {
        let reminder_context = ReminderContext::from_settings(configuration)?;
        let (reporter, port) = bound_port_pair();

        let figment = rocket::Config::figment()
            .merge(("address", configuration.application.host.to_string()))
            .merge(("port", configuration.application.port.unwrap_or(0)))
            .merge((
                "databases.notifications.url",
                configuration.database.connection_string(),
            ));

        let server = rocket::custom(figment)
            .attach(NotifyDbConn::fairing())
            .attach(reporter)
            .manage(push_gateway)
            .manage(task_queue)
            .manage(reminder_context)
            .mount(
                "/",
                routes![
                    health_check,
                    request_created,
                    request_updated,
                    appointment_created,
                    reminder_callback,
                ],
            )
            .register("/", catchers![unprocessable_entity_to_bad_request])
            .ignite()
            .await?;
        Ok(Application { server, port })
    }
}

// With port 0 the real port is only known at liftoff; a fairing reports it
// back so tests can address the spawned server.
pub fn bound_port_pair() -> (PortReporter, BoundPort) {
    let (tx, rx) = mpsc::channel(1);
    (PortReporter { sender: tx }, BoundPort::new(rx))
}

pub struct BoundPort {
    resolved: Mutex<Option<u16>>,
    rx: Mutex<mpsc::Receiver<u16>>,
}

impl BoundPort {
    fn new(rx: mpsc::Receiver<u16>) -> BoundPort {
        BoundPort {
            resolved: Mutex::new(None),
            rx: Mutex::new(rx),
        }
    }

    pub async fn get(&self) -> u16 {
        let mut resolved = self.resolved.lock().await;
        if let Some(port) = *resolved {
            return port;
        }
        let port = self
            .rx
            .lock()
            .await
            .recv()
            .await
            .expect("The server was dropped before liftoff.");
        *resolved = Some(port);
        port
    }
}

pub struct PortReporter {
    sender: mpsc::Sender<u16>,
}

#[rocket::async_trait]
impl rocket::fairing::Fairing for PortReporter {
    fn info(&self) -> Info {
        Info {
            name: "Port Reporter",
            kind: rocket::fairing::Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        // The receiver may be gone when the caller never asks for the port.
        let _ = self.sender.send(rocket.config().port).await;
    }
}
