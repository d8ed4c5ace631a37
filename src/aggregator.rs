use {
    crate::{
        providers::{
            NftCollectionDataProvider, ProviderError, ProviderId, ProviderKind, SelectedProvider,
            Throttle, TokenDataProvider,
        },
        types::{ContractPointer, Currency, Metric, NftCollectionInfo, Numeric, TokenInfo},
    },
    futures::future::try_join_all,
    num_traits::Zero,
    std::{future::Future, time::Duration},
};

/// One provider's total for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderValue {
    pub provider: ProviderId,
    pub kind: ProviderKind,
    pub value: Numeric,
}

/// Fetch every pointer concurrently behind `throttle` and sum the results
///
/// Any failing fetch fails the whole sum; the remaining fetches are dropped.
async fn throttled_sum<'a, F, Fut>(
    throttle: &Throttle,
    pointers: &'a [ContractPointer],
    fetch: F,
) -> Result<Numeric, ProviderError>
where
    F: Fn(&'a ContractPointer) -> Fut,
    Fut: Future<Output = Result<Numeric, ProviderError>>,
{
    let fetches = pointers.iter().map(|pointer| {
        let request = fetch(pointer);
        async move {
            throttle.admit().await;
            request.await
        }
    });

    let values = try_join_all(fetches).await?;
    Ok(values.into_iter().fold(Numeric::zero(), |acc, v| acc + v))
}

/// Sum of one NFT provider's valuations over all collections
///
/// No collections means zero, with no request made.
pub async fn nft_collection_runner<P>(
    provider: &P,
    collections: &[ContractPointer],
    currency: Currency,
    metric: Metric,
) -> Result<Numeric, ProviderError>
where
    P: NftCollectionDataProvider + ?Sized,
{
    if collections.is_empty() {
        return Ok(Numeric::zero());
    }

    let throttle = Throttle::new(provider.throttle_config());
    let value = throttled_sum(&throttle, collections, |collection| async move {
        let info = NftCollectionInfo {
            chain: collection.chain(),
            address: collection.address().to_string(),
            currency,
            metric,
        };
        provider.get_market_cap(&info).await
    })
    .await?;

    log::info!("📊 {} {} {}: {}", provider.name(), currency, metric, value);
    Ok(value)
}

/// Sum of one token provider's market caps over all tokens
///
/// No tokens means zero, with no request made.
pub async fn token_runner<P>(
    provider: &P,
    tokens: &[ContractPointer],
    currency: Currency,
) -> Result<Numeric, ProviderError>
where
    P: TokenDataProvider + ?Sized,
{
    if tokens.is_empty() {
        return Ok(Numeric::zero());
    }

    let throttle = Throttle::new(provider.throttle_config());
    let value = throttled_sum(&throttle, tokens, |token| async move {
        let info = TokenInfo {
            chain: token.chain(),
            address: token.address().to_string(),
            currency,
        };
        provider.get_market_cap(&info).await
    })
    .await?;

    log::info!("📊 {} {}: {}", provider.name(), currency, value);
    Ok(value)
}

/// Run an already selected provider over the pointers of its kind
pub async fn run_selected(
    provider_id: ProviderId,
    selected: &SelectedProvider,
    nft_collections: &[ContractPointer],
    tokens: &[ContractPointer],
    currency: Currency,
    metric: Metric,
) -> Result<ProviderValue, ProviderError> {
    let value = match selected {
        SelectedProvider::Nft(provider) => {
            nft_collection_runner(provider, nft_collections, currency, metric).await?
        }
        SelectedProvider::Token(provider) => token_runner(provider, tokens, currency).await?,
    };

    Ok(ProviderValue {
        provider: provider_id,
        kind: selected.kind(),
        value,
    })
}

/// Connect to `provider_id` and run it
///
/// Connection problems surface before any valuation request is made.
pub async fn run_provider(
    provider_id: ProviderId,
    api_key: &str,
    nft_collections: &[ContractPointer],
    tokens: &[ContractPointer],
    currency: Currency,
    metric: Metric,
    timeout: Duration,
) -> Result<ProviderValue, ProviderError> {
    let selected = provider_id.connect(api_key, timeout)?;
    run_selected(provider_id, &selected, nft_collections, tokens, currency, metric).await
}
