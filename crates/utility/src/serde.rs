pub mod duration {
    use chrono::Duration;
    use schemars::gen::SchemaGenerator;
    use schemars::schema::{InstanceType, Schema, SchemaObject};
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let total_seconds = duration.num_seconds();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        let formatted = format!("{:02}:{:02}:{:02}", hours, minutes, seconds);
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(D::Error::invalid_length(
                parts.len(),
                &"Expected format hh:mm:ss",
            ));
        }
        let hours: i64 = parts[0].parse().map_err(D::Error::custom)?;
        let minutes: i64 = parts[1].parse().map_err(D::Error::custom)?;
        let seconds: i64 = parts[2].parse().map_err(D::Error::custom)?;
        Ok(Duration::hours(hours) + Duration::minutes(minutes) + Duration::seconds(seconds))
    }

    pub fn schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            format: Some("hh:mm:ss".to_owned()),
            ..Default::default()
        }
        .into()
    }
}

/// The upstream API is loose about whether numeric fields arrive as JSON
/// numbers or as numeric strings. Deserialize either into the target type
/// rather than rejecting the whole response over one field's encoding.
pub mod lenient_number {
    use serde::de::{self, Deserialize, Deserializer};
    use std::fmt;
    use std::str::FromStr;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr + Deserialize<'de>,
        T::Err: fmt::Display,
    {
        struct LenientVisitor<T>(std::marker::PhantomData<T>);

        impl<'de, T> de::Visitor<'de> for LenientVisitor<T>
        where
            T: FromStr + Deserialize<'de>,
            T::Err: fmt::Display,
        {
            type Value = T;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number or a numeric string")
            }

            fn visit_str<E>(self, value: &str) -> Result<T, E>
            where
                E: de::Error,
            {
                value.parse().map_err(de::Error::custom)
            }

            fn visit_i64<E>(self, value: i64) -> Result<T, E>
            where
                E: de::Error,
            {
                value.to_string().parse().map_err(de::Error::custom)
            }

            fn visit_u64<E>(self, value: u64) -> Result<T, E>
            where
                E: de::Error,
            {
                value.to_string().parse().map_err(de::Error::custom)
            }

            fn visit_f64<E>(self, value: f64) -> Result<T, E>
            where
                E: de::Error,
            {
                value.to_string().parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(LenientVisitor(std::marker::PhantomData))
    }

    pub fn deserialize_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr + Deserialize<'de>,
        T::Err: fmt::Display,
    {
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            None => Ok(None),
            Some(serde_json::Value::Null) => Ok(None),
            Some(value) => {
                let parsed: T = match value {
                    serde_json::Value::String(s) => s.parse().map_err(de::Error::custom)?,
                    serde_json::Value::Number(n) => {
                        n.to_string().parse().map_err(de::Error::custom)?
                    }
                    other => {
                        return Err(de::Error::custom(format!(
                            "expected a number or numeric string, got {other:?}"
                        )))
                    }
                };
                Ok(Some(parsed))
            }
        }
    }
}
