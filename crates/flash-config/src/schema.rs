//! Schema for the simulation config file.

use flash_types::{ConfigSchema, Field, FieldType, Schema, ValidationError};

const ORDER_OFFSETS: [i64; 3] = [4, 36, 100];

/// Validates the raw TOML tree before it is deserialized into
/// [`FlashConfig`](crate::FlashConfig).
pub struct FlashConfigSchema;

impl FlashConfigSchema {
	fn logging() -> Schema {
		Schema::new(
			vec![],
			vec![
				Field::new("level", FieldType::String),
				Field::new("format", FieldType::OneOf(&["pretty", "json"])),
			],
		)
	}

	fn resolver() -> Schema {
		Schema::new(
			vec![],
			vec![
				Field::new("should_revert", FieldType::Boolean),
				Field::new("ignore_receive", FieldType::Boolean),
			],
		)
	}

	fn order() -> Schema {
		let uint = |name: &str| Field::new(name, FieldType::Uint);
		Schema::new(
			vec![uint("from_amount"), uint("to_amount")],
			vec![
				Field::new("from_actor_receiver", FieldType::Address),
				Field::new("to_token", FieldType::Address),
				Field::new("collateral_receiver", FieldType::Address),
				uint("from_chain"),
				uint("to_chain"),
				uint("collateral_chain"),
				uint("collateral_amount"),
				uint("collateral_rewardable"),
				uint("collateral_unlocked"),
				uint("deadline"),
				uint("time_to_send"),
				uint("time_to_liq_send"),
				uint("nonce"),
			],
		)
	}

	fn scenario() -> Schema {
		Schema::new(
			vec![
				Field::new("adapter", FieldType::OneOf(&["fixed", "dynamic"])),
				Field::new("executor_balance", FieldType::Uint),
				Field::new("order", FieldType::Table(Self::order())),
			],
			vec![
				Field::new(
					"top_up_policy",
					FieldType::OneOf(&["sweep_available", "maximum"]),
				),
				Field::new("max_extra_from_amount", FieldType::Uint),
				Field::new("min_balance_after", FieldType::Uint),
				Field::new(
					"order_offset",
					FieldType::Integer {
						min: Some(4),
						max: Some(100),
					},
				)
				.with_validator(|value| match value.as_integer() {
					Some(offset) if ORDER_OFFSETS.contains(&offset) => Ok(()),
					_ => Err(format!("must be one of {:?}", ORDER_OFFSETS)),
				}),
				Field::new("resolver", FieldType::Table(Self::resolver())),
			],
		)
	}
}

impl ConfigSchema for FlashConfigSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("scenario", FieldType::Table(Self::scenario()))],
			vec![Field::new("logging", FieldType::Table(Self::logging()))],
		);
		schema.validate(config)
	}
}
