use crate::domain::job::JobOutcome;
use async_trait::async_trait;
use std::time::Instant;

/// One kind of batch work: turns a descriptor into an outcome.
///
/// Implementations report their own failures as [`JobOutcome::Error`], so a
/// failing descriptor never stops the rest of the batch.
#[async_trait]
pub trait BatchJob: Send + Sync {
    type Descriptor: Send + Sync;

    fn name(&self) -> &'static str;

    fn describe(&self, descriptor: &Self::Descriptor) -> String;

    async fn run_descriptor(&self, descriptor: &Self::Descriptor) -> JobOutcome;
}

pub struct EtlEngine<J: BatchJob> {
    job: J,
}

impl<J: BatchJob> EtlEngine<J> {
    pub fn new(job: J) -> Self {
        Self { job }
    }

    pub fn job(&self) -> &J {
        &self.job
    }

    /// Runs every descriptor in order and collects one outcome per descriptor.
    pub async fn run(&self, descriptors: &[J::Descriptor]) -> Vec<JobOutcome> {
        let started = Instant::now();
        tracing::info!(
            "Starting {} batch with {} descriptors",
            self.job.name(),
            descriptors.len()
        );

        let mut results = Vec::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            let label = self.job.describe(descriptor);
            tracing::info!("[{}/{}] {}", index + 1, descriptors.len(), label);

            let outcome = self.job.run_descriptor(descriptor).await;
            match &outcome {
                JobOutcome::Success(message) => tracing::info!("✅ {}", message),
                JobOutcome::Error(message) => tracing::error!("❌ {}", message),
            }
            results.push(outcome);
        }

        let failed = results.iter().filter(|o| !o.is_success()).count();
        tracing::info!(
            "{} batch finished in {:?}: {} succeeded, {} failed",
            self.job.name(),
            started.elapsed(),
            results.len() - failed,
            failed
        );
        results
    }
}
