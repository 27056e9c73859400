//! Test helpers shared by the graphgen crates.

pub mod tracing {
    //! A `tracing` layer that keeps closed spans and emitted events so tests
    //! can assert on instrumentation.

    use std::{
        collections::BTreeMap,
        fmt,
        sync::{Arc, Mutex, MutexGuard, PoisonError},
    };

    use tracing::{
        Event, Level, Subscriber,
        field::{Field, Visit},
        span::{Attributes, Id, Record},
    };
    use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

    /// Recorded field values, rendered as text.
    pub type Fields = BTreeMap<String, String>;

    /// A span that has closed, with every field recorded over its lifetime.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct SpanRecord {
        /// Span name from its metadata.
        pub name: String,
        /// Field values, including ones recorded after creation.
        pub fields: Fields,
    }

    impl SpanRecord {
        /// Value of `field`, if it was recorded.
        #[must_use]
        pub fn field(&self, field: &str) -> Option<&str> {
            self.fields.get(field).map(String::as_str)
        }
    }

    /// An emitted event.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct EventRecord {
        /// Event level.
        pub level: Level,
        /// Event fields; the message is stored under `message`.
        pub fields: Fields,
    }

    impl EventRecord {
        /// The event message, if any.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.fields.get("message").map(String::as_str)
        }
    }

    #[derive(Debug, Default)]
    struct Journal {
        spans: Vec<SpanRecord>,
        events: Vec<EventRecord>,
    }

    /// Layer recording spans on close and events on emission.
    ///
    /// Clones share the same journal, so keep one clone for assertions and
    /// hand the other to the subscriber.
    ///
    /// # Examples
    /// ```
    /// use graphgen_test_support::tracing::RecordingLayer;
    /// use tracing_subscriber::layer::SubscriberExt;
    ///
    /// let layer = RecordingLayer::default();
    /// let subscriber = tracing_subscriber::registry().with(layer.clone());
    /// tracing::subscriber::with_default(subscriber, || {
    ///     let _span = tracing::info_span!("demo", answer = 42).entered();
    ///     tracing::info!("inside");
    /// });
    /// assert_eq!(layer.span("demo").and_then(|s| s.field("answer").map(str::to_owned)), Some("42".to_owned()));
    /// assert!(layer.has_event(tracing::Level::INFO, "inside"));
    /// ```
    #[derive(Clone, Debug, Default)]
    pub struct RecordingLayer {
        journal: Arc<Mutex<Journal>>,
    }

    impl RecordingLayer {
        fn journal(&self) -> MutexGuard<'_, Journal> {
            self.journal.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Closed spans in completion order.
        #[must_use]
        pub fn spans(&self) -> Vec<SpanRecord> {
            self.journal().spans.clone()
        }

        /// Events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<EventRecord> {
            self.journal().events.clone()
        }

        /// First closed span called `name`.
        #[must_use]
        pub fn span(&self, name: &str) -> Option<SpanRecord> {
            self.journal()
                .spans
                .iter()
                .find(|span| span.name == name)
                .cloned()
        }

        /// Whether an event with this level and message was emitted.
        #[must_use]
        pub fn has_event(&self, level: Level, message: &str) -> bool {
            self.journal()
                .events
                .iter()
                .any(|event| event.level == level && event.message() == Some(message))
        }
    }

    /// Span extension holding fields until the span closes.
    struct Pending(SpanRecord);

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut fields = Fields::new();
            attrs.record(&mut FieldText(&mut fields));
            span.extensions_mut().insert(Pending(SpanRecord {
                name: attrs.metadata().name().to_owned(),
                fields,
            }));
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            if let Some(Pending(record)) = span.extensions_mut().get_mut::<Pending>() {
                values.record(&mut FieldText(&mut record.fields));
            }
        }

        fn on_close(&self, id: Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(&id) else {
                return;
            };
            if let Some(Pending(record)) = span.extensions_mut().remove::<Pending>() {
                self.journal().spans.push(record);
            }
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Fields::new();
            event.record(&mut FieldText(&mut fields));
            self.journal().events.push(EventRecord {
                level: *event.metadata().level(),
                fields,
            });
        }
    }

    /// Renders strings verbatim and everything else through `Debug`.
    struct FieldText<'a>(&'a mut Fields);

    impl Visit for FieldText<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_owned(), value.to_owned());
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.0.insert(field.name().to_owned(), value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_owned(), format!("{value:?}"));
        }
    }
}

pub mod proptest_profile {
    //! Case-count override for property suites.

    use std::env;

    /// Environment variable overriding the number of proptest cases.
    pub const CASES_ENV_KEY: &str = "GRAPHGEN_PROPTEST_CASES";

    /// Number of cases to run, read from [`CASES_ENV_KEY`] when it holds a
    /// positive integer and `default` otherwise.
    ///
    /// # Examples
    /// ```
    /// use graphgen_test_support::proptest_profile::cases;
    ///
    /// assert!(cases(32) > 0);
    /// ```
    #[must_use]
    pub fn cases(default: u32) -> u32 {
        env::var(CASES_ENV_KEY)
            .ok()
            .and_then(|raw| parse_cases(&raw))
            .unwrap_or(default)
    }

    fn parse_cases(raw: &str) -> Option<u32> {
        let parsed = raw.trim().parse::<u32>().ok()?;
        if parsed == 0 {
            tracing::warn!(env = CASES_ENV_KEY, raw, "ignoring zero case count");
            return None;
        }
        Some(parsed)
    }

}
