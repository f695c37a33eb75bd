//! Static company → ticker lookup table.
//!
//! Each entry lists the surface forms the matcher searches for. Aliases are
//! lowercase. Forms that are also ordinary English words or common names are
//! listed in `ambiguous`; `exclude_contexts` holds phrases that mark a nearby
//! mention as not being about the company.

use crate::domain::values::sector::Sector;

#[derive(Debug)]
pub struct CompanyEntry {
    pub ticker: &'static str,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub sector: Sector,
    pub ambiguous: &'static [&'static str],
    pub exclude_contexts: &'static [&'static str],
}

impl CompanyEntry {
    pub fn is_ambiguous(&self, form: &str) -> bool {
        self.ambiguous.iter().any(|a| *a == form)
    }
}

macro_rules! company {
    ($ticker:expr, $name:expr, $sector:expr) => {
        company!($ticker, $name, $sector, [], [], [])
    };
    ($ticker:expr, $name:expr, $sector:expr, [$($alias:expr),*]) => {
        company!($ticker, $name, $sector, [$($alias),*], [], [])
    };
    ($ticker:expr, $name:expr, $sector:expr, [$($alias:expr),*], [$($amb:expr),*], [$($ex:expr),*]) => {
        CompanyEntry {
            ticker: $ticker,
            name: $name,
            aliases: &[$($alias),*],
            sector: $sector,
            ambiguous: &[$($amb),*],
            exclude_contexts: &[$($ex),*],
        }
    };
}

static CATALOG: &[CompanyEntry] = &[
    // Technology
    company!("AAPL", "Apple", Sector::Technology,
        ["apple inc", "iphone", "tim cook"],
        ["apple"],
        ["big apple", "apple cider", "apple pie", "apple records", "apple orchard"]),
    company!("MSFT", "Microsoft", Sector::Technology, ["xbox", "satya nadella", "azure"]),
    company!("GOOGL", "Alphabet", Sector::Technology, ["google", "youtube", "waymo", "sundar pichai"]),
    company!("AMZN", "Amazon", Sector::ConsumerDiscretionary,
        ["amazon.com", "aws", "amazon web services"],
        ["amazon"],
        ["amazon rainforest", "amazon river", "amazon basin", "brazilian amazon", "amazon jungle"]),
    company!("META", "Meta Platforms", Sector::Communication,
        ["meta", "facebook", "instagram", "whatsapp", "mark zuckerberg", "zuckerberg"],
        ["meta"],
        ["meta-analysis", "meta analysis", "meta description"]),
    company!("TSLA", "Tesla", Sector::Automotive,
        ["tesla motors", "cybertruck", "robotaxi"],
        [],
        ["nikola tesla", "tesla coil"]),
    company!("ORCL", "Oracle", Sector::Technology,
        ["oracle corp", "larry ellison"],
        ["oracle"],
        ["uma oracle", "price oracle", "oracle of omaha", "chainlink", "oracle network"]),
    company!("CRM", "Salesforce", Sector::Technology),
    company!("IBM", "IBM", Sector::Technology, ["international business machines"]),
    company!("PLTR", "Palantir", Sector::Technology, ["palantir technologies"]),
    company!("NFLX", "Netflix", Sector::Communication),
    company!("DIS", "Walt Disney", Sector::Communication, ["disney", "espn", "pixar"]),
    company!("SPOT", "Spotify", Sector::Communication),
    company!("SNAP", "Snap", Sector::Communication,
        ["snapchat", "snap inc"],
        ["snap"],
        ["snap election", "snap benefits", "snap program", "food stamps", "snap recipients"]),
    company!("UBER", "Uber", Sector::Technology, ["uber technologies"]),
    company!("ABNB", "Airbnb", Sector::ConsumerDiscretionary),
    company!("DJT", "Trump Media & Technology Group", Sector::Communication,
        ["trump media", "truth social"]),

    // Semiconductors
    company!("NVDA", "Nvidia", Sector::Semiconductors, ["jensen huang", "geforce"]),
    company!("AMD", "Advanced Micro Devices", Sector::Semiconductors, ["amd", "lisa su"]),
    company!("INTC", "Intel", Sector::Semiconductors,
        ["intel corp", "intel corporation"],
        ["intel"],
        ["intel report", "military intel", "intel community", "intel officials", "defense intel"]),
    company!("TSM", "Taiwan Semiconductor", Sector::Semiconductors, ["tsmc"]),
    company!("AVGO", "Broadcom", Sector::Semiconductors),
    company!("MU", "Micron", Sector::Semiconductors, ["micron technology"]),

    // Crypto-exposed equities
    company!("COIN", "Coinbase", Sector::Crypto),
    company!("MSTR", "MicroStrategy", Sector::Crypto, ["michael saylor", "saylor"]),
    company!("HOOD", "Robinhood", Sector::Financials, ["robinhood markets"]),
    company!("MARA", "Marathon Digital", Sector::Crypto, ["mara holdings"]),
    company!("RIOT", "Riot Platforms", Sector::Crypto, ["riot blockchain"]),

    // Payments & financials
    company!("PYPL", "PayPal", Sector::Financials, ["venmo"]),
    company!("SQ", "Block Inc", Sector::Financials,
        ["square", "cash app", "jack dorsey"],
        ["square"],
        ["times square", "square feet", "square mile", "tiananmen square", "red square", "town square", "square meters"]),
    company!("V", "Visa", Sector::Financials,
        ["visa inc"],
        ["visa"],
        ["student visa", "h-1b", "visa program", "visa requirement", "golden visa", "work visa",
         "travel visa", "visa-free", "visa waiver", "tourist visa", "visa ban", "visas"]),
    company!("MA", "Mastercard", Sector::Financials),
    company!("JPM", "JPMorgan Chase", Sector::Financials, ["jpmorgan", "jp morgan", "jamie dimon", "chase bank"]),
    company!("GS", "Goldman Sachs", Sector::Financials),
    company!("BAC", "Bank of America", Sector::Financials),
    company!("MS", "Morgan Stanley", Sector::Financials),
    company!("WFC", "Wells Fargo", Sector::Financials),
    company!("BRK.B", "Berkshire Hathaway", Sector::Financials, ["warren buffett", "buffett"]),
    company!("APLE", "Apple Hospitality REIT", Sector::Financials, ["apple hospitality"]),

    // Industrials & defense
    company!("BA", "Boeing", Sector::Industrials),
    company!("CAT", "Caterpillar", Sector::Industrials),
    company!("GE", "GE Aerospace", Sector::Industrials, ["general electric"]),
    company!("LMT", "Lockheed Martin", Sector::Defense, ["lockheed"]),
    company!("RTX", "Raytheon", Sector::Defense, ["rtx corp"]),
    company!("NOC", "Northrop Grumman", Sector::Defense, ["northrop"]),
    company!("GD", "General Dynamics", Sector::Defense),

    // Automotive
    company!("F", "Ford Motor", Sector::Automotive,
        ["ford"],
        ["ford"],
        ["harrison ford", "gerald ford", "tom ford", "ford foundation", "betty ford", "rob ford", "doug ford"]),
    company!("GM", "General Motors", Sector::Automotive, ["chevrolet", "chevy"]),
    company!("RIVN", "Rivian", Sector::Automotive),
    company!("LCID", "Lucid Group", Sector::Automotive, ["lucid motors"]),

    // Airlines
    company!("DAL", "Delta Air Lines", Sector::Airlines,
        ["delta airlines", "delta"],
        ["delta"],
        ["delta variant", "mississippi delta", "delta force", "nile delta", "delta state", "river delta"]),
    company!("UAL", "United Airlines", Sector::Airlines),
    company!("AAL", "American Airlines", Sector::Airlines),
    company!("LUV", "Southwest Airlines", Sector::Airlines),

    // Energy
    company!("XOM", "ExxonMobil", Sector::Energy, ["exxon", "exxon mobil"]),
    company!("CVX", "Chevron", Sector::Energy),
    company!("SHEL", "Shell plc", Sector::Energy,
        ["shell", "royal dutch shell"],
        ["shell"],
        ["shell company", "shell companies", "shell game", "shell shock", "artillery shell",
         "shell corporation", "shells"]),
    company!("BP", "British Petroleum", Sector::Energy,
        ["bp"],
        ["bp"],
        ["blood pressure"]),
    company!("OXY", "Occidental Petroleum", Sector::Energy, ["occidental"]),

    // Healthcare
    company!("PFE", "Pfizer", Sector::Healthcare),
    company!("MRNA", "Moderna", Sector::Healthcare),
    company!("LLY", "Eli Lilly", Sector::Healthcare, ["mounjaro", "zepbound"]),
    company!("NVO", "Novo Nordisk", Sector::Healthcare, ["ozempic", "wegovy"]),
    company!("JNJ", "Johnson & Johnson", Sector::Healthcare, ["j&j"]),
    company!("UNH", "UnitedHealth", Sector::Healthcare, ["unitedhealthcare", "unitedhealth group"]),
    company!("CVS", "CVS Health", Sector::Healthcare, ["cvs"]),

    // Consumer
    company!("WMT", "Walmart", Sector::ConsumerStaples),
    company!("TGT", "Target", Sector::ConsumerDiscretionary,
        ["target corp"],
        ["target"],
        ["inflation target", "price target", "target rate", "target range", "rate target",
         "on target", "target date", "targets", "targeted", "military target"]),
    company!("COST", "Costco", Sector::ConsumerStaples),
    company!("HD", "Home Depot", Sector::ConsumerDiscretionary),
    company!("MCD", "McDonald's", Sector::ConsumerDiscretionary, ["mcdonalds"]),
    company!("SBUX", "Starbucks", Sector::ConsumerDiscretionary),
    company!("NKE", "Nike", Sector::ConsumerDiscretionary),
    company!("KO", "Coca-Cola", Sector::ConsumerStaples,
        ["coca cola", "coke"],
        ["coke"],
        []),
    company!("PEP", "PepsiCo", Sector::ConsumerStaples, ["pepsi"]),
    company!("GME", "GameStop", Sector::ConsumerDiscretionary),
    company!("AMC", "AMC Entertainment", Sector::Communication, ["amc theatres"]),
];

/// All catalog entries.
pub fn entries() -> &'static [CompanyEntry] {
    CATALOG
}

/// Case-insensitive ticker lookup.
pub fn by_ticker(ticker: &str) -> Option<&'static CompanyEntry> {
    let t = ticker.trim();
    CATALOG.iter().find(|c| c.ticker.eq_ignore_ascii_case(t))
}

pub fn sector_of(ticker: &str) -> Sector {
    by_ticker(ticker).map(|c| c.sector).unwrap_or(Sector::Unknown)
}

/// Tickers sharing a sector with `ticker`, excluding itself.
pub fn sector_peers(ticker: &str) -> Vec<&'static str> {
    let sector = sector_of(ticker);
    if sector == Sector::Unknown {
        return vec![];
    }
    CATALOG
        .iter()
        .filter(|c| c.sector == sector && !c.ticker.eq_ignore_ascii_case(ticker))
        .map(|c| c.ticker)
        .collect()
}
