use rocket::http::Status;
use rocket::Request;

// A malformed event or callback body (e.g. an unknown reminder kind) is the
// caller's fault, not a semantic 422.
#[catch(422)]
pub fn unprocessable_entity_to_bad_request(_req: &Request) -> Status {
    Status::BadRequest
}
