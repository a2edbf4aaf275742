//! The trading platform architecture shown on the home page.

use crate::components::arch_diagram::{
	ArchLayer, DiagramData, DiagramLink, DiagramNode, LabelSide, NodeGroup, NodeShape,
};

use NodeGroup::{Blue, External, Green, Orange, Red};
use NodeShape::{Db, Hexagon, Icon, Monitor};

fn node(
	id: &str,
	(x, y): (f64, f64),
	group: NodeGroup,
	shape: NodeShape,
	slug: &str,
	description: &str,
) -> DiagramNode {
	DiagramNode {
		id: id.into(),
		subtitle: None,
		x,
		y,
		group,
		shape,
		description: description.into(),
		doc_url: Some(format!("#/docs/{slug}")),
	}
}

fn subtitled(mut node: DiagramNode, subtitle: &str) -> DiagramNode {
	node.subtitle = Some(subtitle.into());
	node
}

fn layer(id: &str, label: &str, rect: (f64, f64, f64, f64), label_side: LabelSide) -> ArchLayer {
	let (x, y, width, height) = rect;
	ArchLayer {
		id: id.into(),
		label: label.into(),
		x,
		y,
		width,
		height,
		label_side,
	}
}

fn nodes() -> Vec<DiagramNode> {
	vec![
		// External tier
		node("Corretoras", (100.0, 50.0), External, Hexagon, "corretoras",
			"Integração com corretoras via protocolos SINACOR, FIX e APIs REST para envio de ordens e recebimento de dados."),
		node("B3", (250.0, 50.0), External, Hexagon, "b3",
			"Conexão direta com a B3 para envio de ordens via FIX e recebimento de dados de mercado."),
		node("Bolsas Internacionais", (650.0, 50.0), External, Hexagon, "bolsas-internacionais",
			"Conexão com bolsas internacionais para obtenção de dados de mercado e cotações."),
		// Routing core
		node("WalletPosition", (250.0, 200.0), Red, Hexagon, "wallet-position",
			"Serviço responsável por consultar e manter a posição e custódia das carteiras dos clientes."),
		node("BackOffice", (100.0, 350.0), Red, Hexagon, "backoffice",
			"Sistema de BackOffice que gerencia dados de saldo, custódia e conciliação de ordens."),
		node("Hades", (250.0, 350.0), Red, Hexagon, "hades",
			"Core do sistema de roteamento de ordens (OMS). Gerencia o ciclo de vida completo das ordens."),
		node("Ares", (400.0, 200.0), Red, Hexagon, "ares",
			"Serviço especializado em ordens complexas e estratégias, como ordens OCO (Order Cancels Order)."),
		node("Caronte", (400.0, 280.0), Red, Hexagon, "caronte",
			"Gerencia lógicas de operações estruturadas como opções e Long&Short."),
		node("CopyInvest", (400.0, 430.0), Red, Hexagon, "copy-invest",
			"Plataforma de \"social trading\" que permite que usuários copiem as operações de traders experientes."),
		// Access layer
		node("HadesProxy", (250.0, 600.0), Red, Hexagon, "hades-proxy",
			"Proxy de acesso para o Hades, otimizando e securizando a comunicação para clientes."),
		node("MercuryProxy", (500.0, 600.0), Orange, Hexagon, "mercury-proxy",
			"Proxy para distribuição de Market Data para os clientes."),
		node("VenusProxy", (700.0, 600.0), Orange, Hexagon, "venus-proxy",
			"Proxy para dados de perfil, configurações e layouts dos usuários."),
		node("InfoProxy", (950.0, 520.0), Green, Hexagon, "info-proxy",
			"Proxy para distribuição de notícias e dados informativos."),
		// Internal systems and market data
		node("AuthAPIGateway", (650.0, 170.0), Orange, Hexagon, "auth-api-gateway",
			"Gateway de API central que lida com a autenticação e autorização de todas as requisições internas e externas."),
		node("Apollo", (600.0, 350.0), Orange, Hexagon, "apollo",
			"Sistema interno para gerenciamento e orquestração de serviços."),
		node("Atlas", (700.0, 350.0), Orange, Hexagon, "atlas",
			"Serviço de Service Discovery, permitindo que serviços se encontrem dinamicamente na rede."),
		node("Minerva", (800.0, 170.0), Orange, Hexagon, "minerva",
			"Serviço de ingestão e processamento de dados de mercado (cotações) de bolsas internacionais."),
		node("Athena", (900.0, 300.0), Orange, Hexagon, "athena",
			"Fornece dados de calendário econômico, relatórios e eventos corporativos."),
		node("Profile", (800.0, 350.0), Orange, Hexagon, "profile",
			"Gerencia perfis de usuário, configurações de plataforma e preferências."),
		// Monitoring and logs
		node("Nasdaq Gateway", (1050.0, 170.0), Orange, Hexagon, "nasdaq-gateway",
			"Gateway específico para conexão com o feed de dados da Nasdaq."),
		node("Replay Dual", (1050.0, 280.0), Orange, Hexagon, "replay-dual",
			"Serviço que grava e permite o replay de dados de mercado para testes e simulações."),
		node("Hermes", (1050.0, 390.0), Orange, Hexagon, "hermes",
			"Processa e distribui notícias e eventos de mercado em tempo real."),
		node("InstrumentationService", (1300.0, 170.0), Green, Hexagon, "instrumentation-service",
			"Coleta e expõe métricas de saúde e performance dos microsserviços."),
		node("InstrumentationProxy", (1300.0, 350.0), Green, Hexagon, "instrumentation-proxy",
			"Proxy que agrega logs de diversos serviços antes de enviá-los para o sistema de armazenamento."),
		node("LogAPI", (1150.0, 520.0), Green, Hexagon, "log-api",
			"API para consulta e gerenciamento de logs centralizados."),
		node("Zabbix", (1500.0, 170.0), Green, Monitor, "zabbix",
			"Ferramenta externa de monitoramento (Zabbix) que consome as métricas do InstrumentationService."),
		subtitled(
			node("WDI", (1500.0, 350.0), Green, Db, "wdi",
				"Armazenamento central de logs (WDI) e ferramentas de NOC (Network Operations Center)."),
			"(NOC Tools)",
		),
		// Clients
		node("Profit Desktop", (250.0, 750.0), Blue, Icon, "profit-desktop",
			"Aplicação cliente para desktop."),
		node("Profit Mobile", (500.0, 750.0), Blue, Icon, "profit-mobile",
			"Aplicação cliente para dispositivos móveis."),
		subtitled(
			node("HomeBrokers", (700.0, 750.0), Blue, Icon, "homebrokers",
				"Plataforma web de HomeBroker para clientes."),
			"(Web)",
		),
	]
}

fn links() -> Vec<DiagramLink> {
	let l = DiagramLink::new;
	vec![
		// Externals into routing
		l("Corretoras", "BackOffice").label("SINACOR\nFIX\nREST API").label_offset(-80.0, 0.0),
		l("B3", "WalletPosition").label("FIX"),
		l("B3", "Hades").label("FIX"),
		// Routing internals
		l("BackOffice", "Hades").label("Ordens"),
		l("Hades", "WalletPosition"),
		l("Hades", "Ares").label("Ordens"),
		l("Hades", "Caronte").label("Ordens"),
		l("Ares", "Caronte"),
		l("Hades", "CopyInvest").label("Ordens"),
		// Routing to access layer
		l("Hades", "HadesProxy").label("Ordens").waypoint(250.0, 450.0),
		l("BackOffice", "HadesProxy"),
		l("HadesProxy", "Profit Desktop").label("Routing"),
		// Market data
		l("Bolsas Internacionais", "Minerva").label("Data"),
		l("Minerva", "AuthAPIGateway"),
		l("Apollo", "AuthAPIGateway").label("Autenticação"),
		l("AuthAPIGateway", "Atlas"),
		l("Atlas", "Profile").label("Service\nDiscovery"),
		l("Minerva", "Profile").label("Cotações"),
		l("Minerva", "Nasdaq Gateway")
			.waypoint(800.0, 100.0)
			.waypoint(950.0, 100.0)
			.label("Mercury\nExchanges"),
		l("Minerva", "Nasdaq Gateway"),
		l("Profile", "Athena").label("Métricas"),
		l("Athena", "Hermes").label("Métricas"),
		l("Nasdaq Gateway", "Replay Dual"),
		// Access layer
		l("CopyInvest", "MercuryProxy"),
		l("Apollo", "MercuryProxy"),
		l("Atlas", "MercuryProxy"),
		l("Profile", "VenusProxy"),
		l("Hermes", "InfoProxy").waypoint(1050.0, 520.0),
		// Clients
		l("MercuryProxy", "Profit Mobile").label("Market Data"),
		l("VenusProxy", "HomeBrokers").label("Layouts/Profile"),
		l("InfoProxy", "HomeBrokers").label("News/Data"),
		// Monitoring
		l("Nasdaq Gateway", "InstrumentationService").basis(),
		l("Replay Dual", "InstrumentationService").basis(),
		l("Hermes", "InstrumentationService").basis(),
		l("Nasdaq Gateway", "InstrumentationProxy").basis(),
		l("Replay Dual", "InstrumentationProxy").basis(),
		l("Hermes", "InstrumentationProxy").basis(),
		l("InstrumentationService", "Zabbix").label("Métricas"),
		l("InstrumentationService", "InstrumentationProxy").label("Logs"),
		l("InstrumentationProxy", "WDI").label("Logs"),
		l("InstrumentationProxy", "LogAPI").label("Logs"),
	]
}

fn layers() -> Vec<ArchLayer> {
	vec![
		layer("roteamento", "Roteamento", (50.0, 150.0, 400.0, 350.0), LabelSide::Top),
		layer("acesso", "Camada de Acesso", (150.0, 575.0, 850.0, 75.0), LabelSide::Left),
		layer("internos", "Sistemas Internos", (550.0, 250.0, 200.0, 150.0), LabelSide::Top),
		layer("marketdata", "Market Data", (770.0, 130.0, 420.0, 310.0), LabelSide::Top),
		layer("monitoring", "Camada de Monitoramento e Logs", (920.0, 80.0, 620.0, 500.0), LabelSide::Top),
	]
}

pub fn platform_data() -> DiagramData {
	DiagramData {
		nodes: nodes(),
		links: links(),
		layers: layers(),
	}
}
