// Channel operations, one file per controller endpoint.
//
// Each file adds inherent methods to `Client`: an async operation that
// performs one bounded request and records the outcome, a `spawn_*`
// variant, and synchronous accessors that only read the cache.

mod control;
mod health;
mod telemetry;
