use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{DepositSettledEvent, EventHandler, EventProducer, Handler, TransferCompletedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub deposit_settled_producer: Vec<EventProducer<DepositSettledEvent>>,
    pub transfer_completed_producer: Vec<EventProducer<TransferCompletedEvent>>,
}

impl EventProducers {
    pub async fn publish_deposit_settled(&self, event: DepositSettledEvent) {
        for emitter in &self.deposit_settled_producer {
            emitter.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_transfer_completed(&self, event: TransferCompletedEvent) {
        for emitter in &self.transfer_completed_producer {
            emitter.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_deposit_settled: Option<EventHandler<DepositSettledEvent>>,
    pub on_transfer_completed: Option<EventHandler<TransferCompletedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_deposit_settled = hooks.on_deposit_settled.map(|f| EventHandler::new(buffer_size, f));
        let on_transfer_completed = hooks.on_transfer_completed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_deposit_settled, on_transfer_completed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_deposit_settled {
            result.deposit_settled_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_transfer_completed {
            result.transfer_completed_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_deposit_settled {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_transfer_completed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_deposit_settled: Option<Handler<DepositSettledEvent>>,
    pub on_transfer_completed: Option<Handler<TransferCompletedEvent>>,
}

impl EventHooks {
    pub fn on_deposit_settled<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(DepositSettledEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_deposit_settled = Some(Arc::new(f));
        self
    }

    pub fn on_transfer_completed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(TransferCompletedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_transfer_completed = Some(Arc::new(f));
        self
    }
}
