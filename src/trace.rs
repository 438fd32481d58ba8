use opentelemetry::{global, KeyValue};
use opentelemetry_sdk::{
	metrics::{
		reader::{DefaultAggregationSelector, DefaultTemporalitySelector},
		MeterProviderBuilder, PeriodicReader, SdkMeterProvider,
	},
	runtime,
	trace::{BatchConfig, Sampler, Tracer},
	Resource,
};
use opentelemetry_semantic_conventions::{
	resource::{DEPLOYMENT_ENVIRONMENT, SERVICE_NAME, SERVICE_VERSION},
	SCHEMA_URL,
};
use tracing::{level_filters::LevelFilter, Level};
use tracing_opentelemetry::MetricsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// When set, traces and metrics are exported over OTLP to this endpoint.
pub const OTLP_ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

/// Constructs a [`Resource`] which describes the service.
fn resource() -> Resource {
	Resource::from_schema_url(
		[
			KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
			KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
			KeyValue::new(
				DEPLOYMENT_ENVIRONMENT,
				if cfg!(debug_assertions) {
					"development"
				} else {
					"production"
				},
			),
		],
		SCHEMA_URL,
	)
}

fn init_meter_provider() -> Result<SdkMeterProvider, opentelemetry::metrics::MetricsError> {
	let exporter = opentelemetry_otlp::new_exporter()
		.tonic()
		.build_metrics_exporter(
			Box::new(DefaultAggregationSelector::new()),
			Box::new(DefaultTemporalitySelector::new()),
		)?;

	let reader = PeriodicReader::builder(exporter, runtime::Tokio)
		.with_interval(std::time::Duration::from_secs(30))
		.build();

	let meter_provider = MeterProviderBuilder::default()
		.with_resource(resource())
		.with_reader(reader)
		.build();

	global::set_meter_provider(meter_provider.clone());

	Ok(meter_provider)
}

fn init_tracer() -> Result<Tracer, opentelemetry::trace::TraceError> {
	opentelemetry_otlp::new_pipeline()
		.tracing()
		.with_trace_config(
			opentelemetry_sdk::trace::Config::default()
				.with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn)))
				.with_resource(resource()),
		)
		.with_batch_config(BatchConfig::default())
		.with_exporter(opentelemetry_otlp::new_exporter().tonic())
		.install_batch(runtime::Tokio)
}

/// Initializes the global tracing subscriber.
///
/// Logs are always written to stdout. When [`OTLP_ENDPOINT_VAR`] is set, spans
/// and metrics are also exported over OTLP; if the exporters cannot be built,
/// the error is logged and the service runs with stdout logging only.
///
/// Must be called from within the Tokio runtime. The returned guard flushes
/// the exporters when dropped.
pub fn init_tracing_subscriber() -> OtelGuard {
	let registry = tracing_subscriber::registry()
		.with(LevelFilter::from_level(Level::INFO))
		.with(tracing_subscriber::fmt::layer().with_ansi(true));

	if std::env::var_os(OTLP_ENDPOINT_VAR).is_none() {
		registry.init();
		return OtelGuard::default();
	}

	match (init_meter_provider(), init_tracer()) {
		(Ok(meter_provider), Ok(tracer)) => {
			registry
				.with(MetricsLayer::new(meter_provider.clone()))
				.with(tracing_opentelemetry::layer().with_tracer(tracer))
				.init();

			OtelGuard {
				meter_provider: Some(meter_provider),
			}
		}
		(meter_provider, tracer) => {
			registry.init();

			match meter_provider {
				Ok(meter_provider) => {
					if let Err(error) = meter_provider.shutdown() {
						tracing::warn!(%error, "failed to shut down the unused meter provider");
					}
				}
				Err(error) => {
					tracing::error!(%error, "failed to initialize the OTLP metrics exporter");
				}
			}

			if let Err(error) = tracer {
				tracing::error!(%error, "failed to initialize the OTLP trace exporter");
			}

			OtelGuard::default()
		}
	}
}

#[derive(Default)]
pub struct OtelGuard {
	meter_provider: Option<SdkMeterProvider>,
}

impl Drop for OtelGuard {
	fn drop(&mut self) {
		let Some(meter_provider) = self.meter_provider.take() else {
			return;
		};

		if let Err(err) = meter_provider.shutdown() {
			eprintln!("{err:?}");
		}

		global::shutdown_tracer_provider();
	}
}
