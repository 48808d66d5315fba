/// Generic server-side processing failure; the fallback for failures without a code.
pub const SERVER_PROCESSING: &str = "Server.Processing";
/// The request could not be decoded.
pub const CLIENT_MESSAGE_ENCODING: &str = "Client.Message.Encoding";
/// The reply could not be encoded.
pub const SERVER_MESSAGE_ENCODING: &str = "Server.Message.Encoding";
/// The addressed service is unknown or its id is invalid.
pub const SERVER_RESOURCE_UNAVAILABLE: &str = "Server.ResourceUnavailable";

/// Header carrying the status code of a fault, outside the fault fields.
pub const STATUS_CODE_HEADER: &str = "DSStatusCode";
