/******************************************************************************
   Author: Hub Sync Contributors
   Date: 19/10/26
******************************************************************************/
/// Authenticated REST client with uniform error classification
pub mod http;
/// Hub REST entities
pub mod hub;
/// `$top`/`$skip` pagination
pub mod pagination;
/// Upsource RPC payloads
pub mod upsource;
