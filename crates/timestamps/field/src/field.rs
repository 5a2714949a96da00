use core::marker::PhantomData;

use bon::Builder;
use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use timestamps_domain::{
    ConversionError, Zone,
    flavor::{ChronoFlavor, Zoned},
    format_iso8601, parse_iso8601,
};

use crate::{
    context::FieldContext,
    error::{MISSING_MESSAGE, NULL_MESSAGE, ValidationError},
};

/// Where a field takes the timezone its values must be expressed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimezoneOption {
    /// Always this timezone.
    Fixed(String),
    /// Whatever [`FieldContext::timezone`] holds for the call.
    FromContext,
}

/// Descriptive metadata exported with the JSON schema of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct FieldMetadata {
    #[builder(into)]
    description: Option<String>,

    #[builder(into)]
    title: Option<String>,
}

/// Options of a [`DateTimeField`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct FieldOptions {
    /// Loading fails when the field is missing from the input.
    #[builder(default)]
    required: bool,

    /// `null` is accepted and loaded as [`FieldValue::Null`].
    #[builder(default)]
    allow_none: bool,

    /// The timezone loaded values must be expressed in.
    timezone: Option<TimezoneOption>,

    /// Copied into the JSON schema.
    #[builder(default)]
    metadata: FieldMetadata,
}

/// A loaded date-time, or one to dump.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<V> {
    /// An explicit `null`.
    Null,
    /// A plain parsed date-time, as loaded when conversion is disabled.
    Plain(DateTime<FixedOffset>),
    /// An enriched flavor value.
    Converted(V),
}

impl<V> FieldValue<V> {
    /// Whether this is an explicit `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// The enriched value, if conversion took place.
    pub fn as_converted(&self) -> Option<&V> {
        match self {
            FieldValue::Converted(value) => Some(value),
            _ => None,
        }
    }

    /// Consumes the value, keeping it only if it is enriched.
    pub fn into_converted(self) -> Option<V> {
        match self {
            FieldValue::Converted(value) => Some(value),
            _ => None,
        }
    }

    /// The plain date-time loaded with conversion disabled.
    pub fn as_plain(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            FieldValue::Plain(datetime) => Some(datetime),
            _ => None,
        }
    }
}

/// A date-time field loading ISO-8601 strings into values of flavor `F`.
#[derive(Debug, Clone, Default)]
pub struct DateTimeField<F = ChronoFlavor> {
    options: FieldOptions,
    flavor: PhantomData<F>,
}

impl<F: Zoned> DateTimeField<F> {
    /// Creates a field with the given options.
    pub fn new(options: FieldOptions) -> Self {
        Self { options, flavor: PhantomData }
    }

    /// The options this field was created with.
    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// Dumps a value the way a plain date-time field does.
    ///
    /// Enriched values are unwrapped first, so the output does not reveal the flavor.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be unwrapped into a raw date-time.
    pub fn serialize(&self, value: Option<&FieldValue<F::Value>>) -> Result<Value, ConversionError> {
        let raw = match value {
            None | Some(FieldValue::Null) => return Ok(Value::Null),
            Some(FieldValue::Plain(datetime)) => *datetime,
            Some(FieldValue::Converted(value)) => F::unwrap(value)?,
        };

        Ok(Value::String(format_iso8601(&raw)))
    }

    /// Loads a value.
    ///
    /// With `convert_dates` disabled in `ctx`, the plain parsed date-time is returned.
    /// Otherwise the value is wrapped into the flavor value and, when a timezone applies,
    /// rejected unless it is already expressed in that timezone.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for `attr` if the value is `null` and the field does
    /// not allow it, if it is not a valid ISO-8601 date-time, or if its offset does not
    /// match the required timezone.
    pub fn deserialize(
        &self,
        value: &Value,
        attr: &str,
        ctx: &FieldContext,
    ) -> Result<FieldValue<F::Value>, ValidationError> {
        let raw = match value {
            Value::Null if self.options.allow_none => return Ok(FieldValue::Null),
            Value::Null => return Err(ValidationError::new(attr, NULL_MESSAGE)),
            Value::String(s) => parse_iso8601(s).map_err(|err| {
                tracing::debug!(attr, %err, "rejected malformed datetime");
                ValidationError::invalid(attr)
            })?,
            _ => return Err(ValidationError::invalid(attr)),
        };

        if !ctx.convert_dates {
            return Ok(FieldValue::Plain(raw));
        }

        let target = F::wrap(raw).map_err(|err| {
            tracing::debug!(attr, flavor = F::NAME, %err, "datetime out of range");
            ValidationError::invalid(attr)
        })?;

        if let Some(timezone) = self.resolve_timezone(ctx) {
            check_timezone::<F>(&target, timezone, attr)?;
        }

        Ok(FieldValue::Converted(target))
    }

    /// Loads `attr` from a JSON object.
    ///
    /// Returns `Ok(None)` when the field is absent and not required.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a required field is absent or if
    /// [`deserialize`](Self::deserialize) fails.
    pub fn load(
        &self,
        data: &Map<String, Value>,
        attr: &str,
        ctx: &FieldContext,
    ) -> Result<Option<FieldValue<F::Value>>, ValidationError> {
        match data.get(attr) {
            Some(value) => self.deserialize(value, attr, ctx).map(Some),
            None if self.options.required => Err(ValidationError::new(attr, MISSING_MESSAGE)),
            None => Ok(None),
        }
    }

    /// Dumps `value` into `out` under `attr`.
    ///
    /// # Errors
    ///
    /// Returns an error if [`serialize`](Self::serialize) fails.
    pub fn dump(
        &self,
        value: Option<&FieldValue<F::Value>>,
        attr: &str,
        out: &mut Map<String, Value>,
    ) -> Result<(), ConversionError> {
        out.insert(attr.to_owned(), self.serialize(value)?);
        Ok(())
    }

    /// The JSON schema of this field.
    ///
    /// Description and title are copied over from the field metadata when set.
    pub fn json_schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".into(), "string".into());
        schema.insert("format".into(), "date-time".into());

        let FieldMetadata { description, title } = &self.options.metadata;

        if let Some(description) = description {
            schema.insert("description".into(), description.as_str().into());
        }

        if let Some(title) = title {
            schema.insert("title".into(), title.as_str().into());
        }

        Value::Object(schema)
    }

    fn resolve_timezone<'a>(&'a self, ctx: &'a FieldContext) -> Option<&'a str> {
        match &self.options.timezone {
            Some(TimezoneOption::Fixed(timezone)) => Some(timezone.as_str()),
            Some(TimezoneOption::FromContext) | None => ctx.timezone.as_deref(),
        }
    }
}

/// Rejects `target` unless rendering it in `timezone` leaves its rendering unchanged,
/// i.e. unless its offset is the one `timezone` observes at that instant.
fn check_timezone<F: Zoned>(
    target: &F::Value,
    timezone: &str,
    attr: &str,
) -> Result<(), ValidationError> {
    let zone: Zone =
        timezone.parse().map_err(|_| ValidationError::unknown_timezone(attr, timezone))?;

    let rendered = F::render(target).and_then(|original| {
        F::to_zone(target, &zone)
            .and_then(|converted| F::render(&converted))
            .map(|converted| (original, converted))
    });

    match rendered {
        Ok((original, converted)) if original == converted => Ok(()),
        Ok((original, converted)) => {
            tracing::debug!(attr, %timezone, %original, %converted, "datetime not in timezone");
            Err(ValidationError::timezone_mismatch(attr, timezone))
        },
        Err(err) => {
            tracing::debug!(attr, %timezone, %err, "datetime could not be rendered in timezone");
            Err(ValidationError::timezone_mismatch(attr, timezone))
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use timestamps_domain::{Moment, flavor::TimeFlavor};

    use super::*;

    fn field(timezone: Option<TimezoneOption>) -> DateTimeField {
        DateTimeField::new(FieldOptions { timezone, ..FieldOptions::default() })
    }

    #[test]
    fn accepts_matching_timezone() {
        let value = field(Some(TimezoneOption::Fixed("UTC".into())))
            .deserialize(&json!("2016-12-13T02:09:48.075736+00:00"), "created", &FieldContext::default())
            .unwrap();

        let moment = value.into_converted().unwrap();
        assert_eq!(moment.to_rfc3339(), "2016-12-13T02:09:48.075736+00:00");
    }

    #[test]
    fn rejects_mismatched_timezone() {
        let err = field(Some(TimezoneOption::Fixed("UTC".into())))
            .deserialize(&json!("2016-12-13T02:09:48+05:00"), "created", &FieldContext::default())
            .unwrap_err();

        assert_eq!(err.field(), "created");
        assert_eq!(err.messages(), ["The provided datetime is not in the UTC timezone."]);
    }

    #[test]
    fn utc_input_is_rejected_for_other_zones() {
        let err = field(Some(TimezoneOption::Fixed("America/Chicago".into())))
            .deserialize(&json!("2020-01-01T00:00:00Z"), "at", &FieldContext::default())
            .unwrap_err();

        assert_eq!(err.messages(), ["The provided datetime is not in the America/Chicago timezone."]);
    }

    #[test]
    fn check_follows_daylight_saving() {
        let field = field(Some(TimezoneOption::Fixed("Europe/Berlin".into())));
        let ctx = FieldContext::default();

        assert!(field.deserialize(&json!("2021-01-10T10:00:00+01:00"), "at", &ctx).is_ok());
        assert!(field.deserialize(&json!("2021-07-10T10:00:00+02:00"), "at", &ctx).is_ok());
        assert!(field.deserialize(&json!("2021-07-10T10:00:00+01:00"), "at", &ctx).is_err());
    }

    #[test]
    fn timezone_can_come_from_context() {
        let ctx = FieldContext::with_timezone("Asia/Tokyo");

        for field in [field(None), field(Some(TimezoneOption::FromContext))] {
            assert!(field.deserialize(&json!("2020-05-05T09:00:00+09:00"), "at", &ctx).is_ok());
            assert!(field.deserialize(&json!("2020-05-05T09:00:00+08:00"), "at", &ctx).is_err());
        }
    }

    #[test]
    fn field_timezone_wins_over_context() {
        let ctx = FieldContext::with_timezone("Asia/Tokyo");

        let value = field(Some(TimezoneOption::Fixed("+00:00".into())))
            .deserialize(&json!("2020-05-05T00:00:00+00:00"), "at", &ctx);

        assert!(value.is_ok());
    }

    #[test]
    fn unknown_timezone_is_reported() {
        let err = field(Some(TimezoneOption::Fixed("Nowhere/Land".into())))
            .deserialize(&json!("2020-05-05T00:00:00+00:00"), "at", &FieldContext::default())
            .unwrap_err();

        assert_eq!(err.messages(), ["Unknown timezone Nowhere/Land."]);
    }

    #[test]
    fn multibyte_context_timezone_is_reported() {
        let err = DateTimeField::<ChronoFlavor>::default()
            .deserialize(&json!("2020-01-01T00:00:00+00:00"), "at", &FieldContext::with_timezone("+aé1"))
            .unwrap_err();

        assert_eq!(err.messages(), ["Unknown timezone +aé1."]);
    }

    #[test]
    fn skips_conversion_when_disabled() {
        let value = field(Some(TimezoneOption::Fixed("UTC".into())))
            .deserialize(&json!("2016-12-13T02:09:48+05:00"), "at", &FieldContext::without_conversion())
            .unwrap();

        assert!(value.as_converted().is_none());
        assert_eq!(value.as_plain().unwrap().offset().local_minus_utc(), 5 * 3600);
    }

    #[test]
    fn null_handling_follows_options() {
        let ctx = FieldContext::default();

        let err = field(None).deserialize(&Value::Null, "archived", &ctx).unwrap_err();
        assert_eq!(err.messages(), [NULL_MESSAGE]);

        let nullable = DateTimeField::<ChronoFlavor>::new(FieldOptions::builder().allow_none(true).build());
        assert!(nullable.deserialize(&Value::Null, "archived", &ctx).unwrap().is_null());
        assert_eq!(nullable.serialize(Some(&FieldValue::Null)).unwrap(), Value::Null);
        assert_eq!(nullable.serialize(None).unwrap(), Value::Null);
    }

    #[test]
    fn rejects_non_datetimes() {
        let ctx = FieldContext::default();

        for value in
            [json!("tomorrow"), json!(1_481_594_988), json!({"at": "2020-01-01"}), json!("2020-01-01")]
        {
            let err = field(None).deserialize(&value, "at", &ctx).unwrap_err();
            assert_eq!(err.messages(), ["Not a valid datetime."]);
        }
    }

    #[test]
    fn accepts_minute_precision() {
        let value = field(Some(TimezoneOption::Fixed("UTC".into())))
            .deserialize(&json!("2016-12-13T02:09+00:00"), "at", &FieldContext::default())
            .unwrap();

        assert_eq!(
            field(None).serialize(Some(&value)).unwrap(),
            json!("2016-12-13T02:09:00+00:00")
        );
    }

    #[test]
    fn dump_is_indistinguishable_from_plain() {
        let field = field(None);
        let raw = parse_iso8601("2016-12-13T02:09:48.075736+00:00").unwrap();

        let plain = field.serialize(Some(&FieldValue::Plain(raw))).unwrap();
        let enriched = field.serialize(Some(&FieldValue::Converted(Moment::new(raw)))).unwrap();

        assert_eq!(plain, enriched);
        assert_eq!(enriched, json!("2016-12-13T02:09:48.075736+00:00"));
    }

    #[test]
    fn time_flavor_loads_offset_date_times() {
        let field = DateTimeField::<TimeFlavor>::new(
            FieldOptions::builder().timezone(TimezoneOption::Fixed("-03:00".into())).build(),
        );
        let ctx = FieldContext::default();

        let value = field.deserialize(&json!("2022-08-01T10:15:00-03:00"), "at", &ctx).unwrap();
        let odt = value.as_converted().unwrap();
        assert_eq!(odt.offset().whole_hours(), -3);
        assert_eq!(field.serialize(Some(&value)).unwrap(), json!("2022-08-01T10:15:00-03:00"));

        assert!(field.deserialize(&json!("2022-08-01T13:15:00Z"), "at", &ctx).is_err());
    }

    #[test]
    fn load_respects_required() {
        let data = json!({"created": "2020-01-01T00:00:00+00:00"});
        let data = data.as_object().unwrap();
        let ctx = FieldContext::default();

        let required =
            DateTimeField::<ChronoFlavor>::new(FieldOptions::builder().required(true).build());
        assert!(required.load(data, "created", &ctx).unwrap().is_some());
        assert_eq!(
            required.load(data, "modified", &ctx).unwrap_err().messages(),
            ["Missing data for required field."]
        );
        assert!(field(None).load(data, "modified", &ctx).unwrap().is_none());
    }

    #[test]
    fn json_schema_copies_metadata() {
        assert_eq!(field(None).json_schema(), json!({"type": "string", "format": "date-time"}));

        let metadata = FieldMetadata::builder()
            .description("When the record was created.")
            .title("Created")
            .build();
        let field = DateTimeField::<ChronoFlavor>::new(FieldOptions::builder().metadata(metadata).build());

        assert_eq!(
            field.json_schema(),
            json!({
                "type": "string",
                "format": "date-time",
                "description": "When the record was created.",
                "title": "Created",
            })
        );
    }
}
