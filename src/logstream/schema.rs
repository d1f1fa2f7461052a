//! Schema of the `auth0_log_stream` resource.

use super::model::{
    StreamType, DATADOG_REGIONS, HTTP_CONTENT_FORMATS, MIXPANEL_REGIONS, STATUS_VALUES,
};
use crate::schema::{
    AllowedValues, Attribute, AttributeFlags, AttributeType, Block, NestedBlock, Schema,
};

/// Build the resource schema.
pub fn resource_schema() -> Schema {
    let types = StreamType::names();

    Schema::v0()
        .with_description("With this resource, you can manage your Auth0 log streams.")
        .with_attribute(
            "id",
            Attribute::computed_string().with_description("Identifier assigned by Auth0."),
        )
        .with_attribute(
            "name",
            Attribute::required_string().with_description("Name of the log stream."),
        )
        .with_attribute(
            "type",
            Attribute::required_string()
                .with_force_new()
                .with_allowed_values(AllowedValues::ignore_case(&types))
                .with_description(format!(
                    "Type of the log stream, which indicates the sink provider. Options include: {}.",
                    AllowedValues::exact(&types).describe()
                )),
        )
        .with_attribute(
            "status",
            Attribute::optional_computed_string()
                .with_allowed_values(AllowedValues::exact(&STATUS_VALUES))
                .with_description(format!(
                    "The current status of the log stream. Options are {}.",
                    AllowedValues::exact(&STATUS_VALUES).describe()
                )),
        )
        .with_attribute(
            "filters",
            Attribute::new(
                AttributeType::list_of_string_maps(),
                AttributeFlags::optional(),
            )
            .with_description(
                "Only logs events matching these filters will be delivered by the stream. \
                 If omitted or empty, all events will be delivered.",
            ),
        )
        .with_block(
            "sink",
            NestedBlock::single(
                sink_block().with_description("The sink configuration for the log stream."),
            )
            .required(),
        )
}

fn sink_block() -> Block {
    const HTTP_GROUP: [&str; 4] = [
        "http_endpoint",
        "http_content_format",
        "http_content_type",
        "http_authorization",
    ];
    const SPLUNK_GROUP: [&str; 4] = ["splunk_domain", "splunk_token", "splunk_port", "splunk_secure"];
    const MIXPANEL_GROUP: [&str; 4] = [
        "mixpanel_region",
        "mixpanel_project_id",
        "mixpanel_service_account_username",
        "mixpanel_service_account_password",
    ];
    const AZURE_GROUP: [&str; 3] = ["azure_subscription_id", "azure_resource_group", "azure_region"];

    Block::new()
        // Amazon EventBridge
        .with_attribute(
            "aws_account_id",
            Attribute::optional_string()
                .with_force_new()
                .with_required_with(&["aws_region"])
                .with_description("The AWS Account ID."),
        )
        .with_attribute(
            "aws_region",
            Attribute::optional_string()
                .with_force_new()
                .with_required_with(&["aws_account_id"])
                .with_description("The AWS Region, e.g. \"us-east-2\"."),
        )
        .with_attribute(
            "aws_partner_event_source",
            Attribute::computed_string().with_description(
                "Name of the Partner Event Source to be used with AWS. \
                 Generated by Auth0 and passed to AWS.",
            ),
        )
        // Azure Event Grid
        .with_attribute(
            "azure_subscription_id",
            Attribute::optional_string()
                .with_force_new()
                .with_required_with(&others(&AZURE_GROUP, "azure_subscription_id"))
                .with_description(
                    "The unique alphanumeric string that identifies your Azure subscription.",
                ),
        )
        .with_attribute(
            "azure_resource_group",
            Attribute::optional_string()
                .with_force_new()
                .with_required_with(&others(&AZURE_GROUP, "azure_resource_group"))
                .with_description(
                    "The Azure EventGrid resource group which allows you to manage all \
                     Azure assets within one subscription.",
                ),
        )
        .with_attribute(
            "azure_region",
            Attribute::optional_string()
                .with_force_new()
                .with_required_with(&others(&AZURE_GROUP, "azure_region"))
                .with_description("The Azure region code, e.g. \"ne\"."),
        )
        .with_attribute(
            "azure_partner_topic",
            Attribute::computed_string().with_description(
                "Name of the Partner Topic to be used with Azure. Generally should not be specified.",
            ),
        )
        // HTTP
        .with_attribute(
            "http_content_format",
            Attribute::optional_string()
                .with_allowed_values(AllowedValues::exact(&HTTP_CONTENT_FORMATS))
                .with_required_with(&others(&HTTP_GROUP, "http_content_format"))
                .with_description(format!(
                    "The format of data sent over HTTP. Options are {}.",
                    AllowedValues::exact(&HTTP_CONTENT_FORMATS).describe()
                )),
        )
        .with_attribute(
            "http_content_type",
            Attribute::optional_string()
                .with_required_with(&others(&HTTP_GROUP, "http_content_type"))
                .with_description(
                    "The \"Content-Type\" header to send over HTTP. \
                     Common value is \"application/json\".",
                ),
        )
        .with_attribute(
            "http_endpoint",
            Attribute::optional_string()
                .with_required_with(&others(&HTTP_GROUP, "http_endpoint"))
                .with_description("The HTTP endpoint to send streaming logs."),
        )
        .with_attribute(
            "http_authorization",
            Attribute::optional_string()
                .sensitive()
                .with_required_with(&others(&HTTP_GROUP, "http_authorization"))
                .with_description("Sent in the HTTP \"Authorization\" header with each request."),
        )
        .with_attribute(
            "http_custom_headers",
            Attribute::new(
                AttributeType::list_of_string_maps(),
                AttributeFlags::optional(),
            )
            .with_description("Additional HTTP headers to be included as part of the HTTP request."),
        )
        // Datadog
        .with_attribute(
            "datadog_region",
            Attribute::optional_string()
                .with_allowed_values(AllowedValues::exact(&DATADOG_REGIONS))
                .with_required_with(&["datadog_api_key"])
                .with_description(format!(
                    "The Datadog region. Options are {}.",
                    AllowedValues::exact(&DATADOG_REGIONS).describe()
                )),
        )
        .with_attribute(
            "datadog_api_key",
            Attribute::optional_string()
                .sensitive()
                .with_required_with(&["datadog_region"])
                .with_description("The Datadog API key."),
        )
        // Splunk
        .with_attribute(
            "splunk_domain",
            Attribute::optional_string()
                .with_required_with(&others(&SPLUNK_GROUP, "splunk_domain"))
                .with_description("The Splunk domain name."),
        )
        .with_attribute(
            "splunk_token",
            Attribute::optional_string()
                .sensitive()
                .with_required_with(&others(&SPLUNK_GROUP, "splunk_token"))
                .with_description("The Splunk access token."),
        )
        .with_attribute(
            "splunk_port",
            Attribute::optional_string()
                .with_required_with(&others(&SPLUNK_GROUP, "splunk_port"))
                .with_description("The Splunk port."),
        )
        .with_attribute(
            "splunk_secure",
            Attribute::optional_bool()
                .with_required_with(&others(&SPLUNK_GROUP, "splunk_secure"))
                .with_description(
                    "This toggle should be turned off when using self-signed certificates.",
                ),
        )
        // Sumo Logic
        .with_attribute(
            "sumo_source_address",
            Attribute::optional_string().with_description(
                "Generated URL for your defined HTTP source in Sumo Logic for \
                 collecting streaming data from Auth0.",
            ),
        )
        // Mixpanel
        .with_attribute(
            "mixpanel_region",
            Attribute::optional_string()
                .with_allowed_values(AllowedValues::exact(&MIXPANEL_REGIONS))
                .with_required_with(&others(&MIXPANEL_GROUP, "mixpanel_region"))
                .with_description(format!(
                    "The Mixpanel region. Options are {}. \
                     EU is required for customers with EU data residency requirements.",
                    AllowedValues::exact(&MIXPANEL_REGIONS).describe()
                )),
        )
        .with_attribute(
            "mixpanel_project_id",
            Attribute::optional_string()
                .with_required_with(&others(&MIXPANEL_GROUP, "mixpanel_project_id"))
                .with_description("The Mixpanel project ID, found on the Project Settings page."),
        )
        .with_attribute(
            "mixpanel_service_account_username",
            Attribute::optional_string()
                .with_required_with(&others(&MIXPANEL_GROUP, "mixpanel_service_account_username"))
                .with_description(
                    "The Mixpanel Service Account username. \
                     Services Accounts can be created in the Project Settings page.",
                ),
        )
        .with_attribute(
            "mixpanel_service_account_password",
            Attribute::optional_string()
                .sensitive()
                .with_required_with(&others(&MIXPANEL_GROUP, "mixpanel_service_account_password"))
                .with_description("The Mixpanel Service Account password."),
        )
        // Segment
        .with_attribute(
            "segment_write_key",
            Attribute::optional_string()
                .sensitive()
                .with_description("The Segment Write Key."),
        )
}

/// Every member of `group` except `owner`.
fn others<'a>(group: &[&'a str], owner: &str) -> Vec<&'a str> {
    group.iter().copied().filter(|name| *name != owner).collect()
}
