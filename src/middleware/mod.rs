/*
 * Responsibility
 * - middleware の公開インターフェース
 * - augment: RequestAugmenter の操作を route ごとに掛ける
 * - session: Cookie セッション
 * - http: request-id / trace / body limit / timeout
 */
pub mod augment;
pub mod http;
pub mod session;
